//! # Parsing de Requests HTTP
//! src/http/request.rs
//!
//! Este módulo implementa un parser HTTP desde cero para la cabecera de un
//! request (request line + headers, hasta la línea en blanco).
//!
//! El parser es una función pura sobre los bytes de entrada: no tiene
//! estado compartido entre invocaciones, así que múltiples workers pueden
//! parsear en paralelo sin ninguna serialización.
//!
//! ## Formato de un Request
//!
//! ```text
//! GET /index.html HTTP/1.1\r\n
//! Host: localhost:8080\r\n
//! User-Agent: curl/7.68.0\r\n
//! \r\n
//! ```
//!
//! ## Componentes
//!
//! 1. **Request Line**: `METHOD URI VERSION` separados por whitespace
//! 2. **Headers**: Pares `Name: Value` (uno por línea)
//! 3. **Empty Line**: `\r\n` que marca el fin de la cabecera

use std::collections::HashMap;

/// Representa la cabecera de un request HTTP parseada.
///
/// Invariante: si el parsing tuvo éxito, `method`, `uri` y `version` son
/// siempre no vacíos. Un request que no parsea se representa como
/// `Err(ParseError)`, nunca como un struct a medio llenar.
#[derive(Debug, Clone)]
pub struct Request {
    /// Método HTTP tal cual llegó (ej: "GET"). Se conserva como string
    /// para que los métodos no soportados lleguen al routing y reciban 501.
    method: String,

    /// URI solicitada (ej: "/index.html")
    uri: String,

    /// Versión HTTP tal cual llegó (ej: "HTTP/1.1"). La validación de
    /// versión es responsabilidad del handler, no del parser.
    version: String,

    /// Headers HTTP. Los nombres se guardan en minúsculas para que la
    /// búsqueda sea case-insensitive, como manda la semántica HTTP.
    headers: HashMap<String, String>,
}

/// Errores que pueden ocurrir durante el parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Request vacío (el cliente cerró sin mandar nada útil)
    EmptyRequest,

    /// Request line con menos de 3 tokens, o bytes que no son texto
    InvalidRequestLine,

    /// Header sin el separador ':'
    InvalidHeader(String),
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::EmptyRequest => write!(f, "Empty request"),
            ParseError::InvalidRequestLine => write!(f, "Invalid request line format"),
            ParseError::InvalidHeader(h) => write!(f, "Invalid header: {}", h),
        }
    }
}

impl std::error::Error for ParseError {}

impl Request {
    /// Parsea la cabecera de un request HTTP desde bytes.
    ///
    /// El buffer debe contener la request line y los headers, hasta la
    /// línea en blanco inclusive (el lector de la conexión se encarga de
    /// cortar ahí).
    ///
    /// # Retorna
    ///
    /// * `Ok(Request)` - Request parseado exitosamente
    /// * `Err(ParseError)` - Error durante el parsing
    ///
    /// # Ejemplo
    ///
    /// ```
    /// use icws::http::Request;
    ///
    /// let raw = b"GET /index.html HTTP/1.1\r\nHost: localhost\r\n\r\n";
    /// let request = Request::parse(raw).unwrap();
    ///
    /// assert_eq!(request.method(), "GET");
    /// assert_eq!(request.uri(), "/index.html");
    /// assert_eq!(request.version(), "HTTP/1.1");
    /// ```
    pub fn parse(buffer: &[u8]) -> Result<Self, ParseError> {
        // Convertir a string (validando que sea UTF-8 válido)
        let request_str =
            std::str::from_utf8(buffer).map_err(|_| ParseError::InvalidRequestLine)?;

        if request_str.trim().is_empty() {
            return Err(ParseError::EmptyRequest);
        }

        // Separar por \r\n para obtener líneas
        let lines: Vec<&str> = request_str.split("\r\n").collect();

        // 1. Parsear la request line (primera línea)
        let (method, uri, version) = Self::parse_request_line(lines[0])?;

        // 2. Parsear headers (resto de líneas hasta encontrar línea vacía)
        let headers = Self::parse_headers(&lines[1..])?;

        Ok(Request {
            method,
            uri,
            version,
            headers,
        })
    }

    /// Parsea la request line (primera línea del request)
    ///
    /// Formato: `GET /index.html HTTP/1.1`. Con menos de 3 tokens el
    /// request es inválido; tokens extra se ignoran.
    fn parse_request_line(line: &str) -> Result<(String, String, String), ParseError> {
        let parts: Vec<&str> = line.split_whitespace().collect();

        if parts.len() < 3 {
            return Err(ParseError::InvalidRequestLine);
        }

        Ok((
            parts[0].to_string(),
            parts[1].to_string(),
            parts[2].to_string(),
        ))
    }

    /// Parsea los headers HTTP
    ///
    /// Cada header tiene formato: "Name: Value". Los nombres se guardan
    /// en minúsculas.
    fn parse_headers(lines: &[&str]) -> Result<HashMap<String, String>, ParseError> {
        let mut headers = HashMap::new();

        for line in lines {
            // La línea vacía marca el fin de los headers
            if line.trim().is_empty() {
                break;
            }

            // Buscar el separador ':'
            if let Some(colon_pos) = line.find(':') {
                let name = line[..colon_pos].trim().to_ascii_lowercase();
                let value = line[colon_pos + 1..].trim().to_string();
                headers.insert(name, value);
            } else {
                // Header sin ':' es inválido
                return Err(ParseError::InvalidHeader(line.to_string()));
            }
        }

        Ok(headers)
    }

    // === Métodos públicos para acceder a los campos ===

    /// Obtiene el método HTTP del request
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Obtiene la URI del request
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Obtiene la versión HTTP
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Obtiene todos los headers
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Obtiene un header específico. La búsqueda es case-insensitive.
    ///
    /// # Ejemplo
    /// ```
    /// use icws::http::Request;
    ///
    /// let raw = b"GET / HTTP/1.1\r\nHost: localhost\r\n\r\n";
    /// let request = Request::parse(raw).unwrap();
    ///
    /// assert_eq!(request.header("host"), Some("localhost"));
    /// assert_eq!(request.header("HOST"), Some("localhost"));
    /// ```
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(|s| s.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_get() {
        let raw = b"GET / HTTP/1.1\r\n\r\n";
        let request = Request::parse(raw).unwrap();

        assert_eq!(request.method(), "GET");
        assert_eq!(request.uri(), "/");
        assert_eq!(request.version(), "HTTP/1.1");
        assert!(request.headers().is_empty());
    }

    #[test]
    fn test_parse_with_path() {
        let raw = b"GET /images/logo.png HTTP/1.1\r\n\r\n";
        let request = Request::parse(raw).unwrap();

        assert_eq!(request.uri(), "/images/logo.png");
    }

    #[test]
    fn test_parse_with_headers() {
        let raw = b"GET / HTTP/1.1\r\nHost: localhost:8080\r\nUser-Agent: test\r\n\r\n";
        let request = Request::parse(raw).unwrap();

        assert_eq!(request.header("Host"), Some("localhost:8080"));
        assert_eq!(request.header("User-Agent"), Some("test"));
    }

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let raw = b"GET / HTTP/1.1\r\nCoNtEnT-TyPe: text/plain\r\n\r\n";
        let request = Request::parse(raw).unwrap();

        assert_eq!(request.header("content-type"), Some("text/plain"));
        assert_eq!(request.header("Content-Type"), Some("text/plain"));
    }

    #[test]
    fn test_unknown_method_is_preserved() {
        // El parser no rechaza métodos: eso lo decide el routing (501)
        let raw = b"DELETE /thing HTTP/1.1\r\n\r\n";
        let request = Request::parse(raw).unwrap();

        assert_eq!(request.method(), "DELETE");
    }

    #[test]
    fn test_old_version_is_preserved() {
        // La versión tampoco se valida acá: el handler responde 505
        let raw = b"GET / HTTP/1.0\r\n\r\n";
        let request = Request::parse(raw).unwrap();

        assert_eq!(request.version(), "HTTP/1.0");
    }

    #[test]
    fn test_empty_request() {
        let raw = b"";
        let result = Request::parse(raw);

        assert!(matches!(result, Err(ParseError::EmptyRequest)));
    }

    #[test]
    fn test_invalid_request_line_too_few_tokens() {
        let raw = b"garbage\r\n\r\n"; // 1 solo token
        let result = Request::parse(raw);

        assert!(matches!(result, Err(ParseError::InvalidRequestLine)));
    }

    #[test]
    fn test_invalid_request_line_two_tokens() {
        let raw = b"GET /\r\n\r\n"; // falta la versión
        let result = Request::parse(raw);

        assert!(matches!(result, Err(ParseError::InvalidRequestLine)));
    }

    #[test]
    fn test_invalid_header_without_colon() {
        let raw = b"GET / HTTP/1.1\r\nbroken header line\r\n\r\n";
        let result = Request::parse(raw);

        assert!(matches!(result, Err(ParseError::InvalidHeader(_))));
    }

    #[test]
    fn test_non_utf8_input() {
        let raw = [0xff, 0xfe, 0x00, 0x41];
        let result = Request::parse(&raw);

        assert!(matches!(result, Err(ParseError::InvalidRequestLine)));
    }

    #[test]
    fn test_parse_is_deterministic() {
        let raw = b"GET /a.css HTTP/1.1\r\nHost: h\r\n\r\n";
        let first = Request::parse(raw).unwrap();
        let second = Request::parse(raw).unwrap();

        assert_eq!(first.method(), second.method());
        assert_eq!(first.uri(), second.uri());
        assert_eq!(first.version(), second.version());
        assert_eq!(first.headers(), second.headers());
    }
}
