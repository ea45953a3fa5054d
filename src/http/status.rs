//! # Códigos de Estado HTTP
//! src/http/status.rs
//!
//! Define el conjunto cerrado de códigos de estado que usa el servidor.
//! Un código fuera de este conjunto es un error de programación, no un
//! caso de runtime: por eso es un enum y no un u16 suelto.

/// Códigos de estado HTTP que soporta el servidor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK - La petición fue exitosa
    Ok = 200,

    /// 400 Bad Request - Request malformado (falla de parsing)
    BadRequest = 400,

    /// 404 File Not Found - El archivo solicitado no existe
    NotFound = 404,

    /// 408 Connection Timeouts - La lectura del request excedió el timeout
    RequestTimeout = 408,

    /// 501 Unsupported Methods - Método distinto de GET/HEAD
    NotImplemented = 501,

    /// 505 HTTP Version Not Supported - Versión distinta de HTTP/1.1
    VersionNotSupported = 505,
}

impl StatusCode {
    /// Convierte el código a su valor numérico
    ///
    /// # Ejemplo
    /// ```
    /// use icws::http::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// ```
    pub fn as_u16(&self) -> u16 {
        *self as u16
    }

    /// Retorna el texto de razón (reason phrase) asociado al código.
    ///
    /// Las frases son fijas por código; cada respuesta las emite tal cual.
    ///
    /// # Ejemplo
    /// ```
    /// use icws::http::StatusCode;
    /// assert_eq!(StatusCode::Ok.reason_phrase(), "OK");
    /// assert_eq!(StatusCode::NotFound.reason_phrase(), "File Not Found");
    /// ```
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::NotFound => "File Not Found",
            StatusCode::RequestTimeout => "Connection Timeouts",
            StatusCode::NotImplemented => "Unsupported Methods",
            StatusCode::VersionNotSupported => "HTTP Version Not Supported",
        }
    }

    /// Verifica si el código indica éxito (2xx)
    pub fn is_success(&self) -> bool {
        matches!(self, StatusCode::Ok)
    }
}

impl std::fmt::Display for StatusCode {
    /// Formato: "200 OK"
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.as_u16(), self.reason_phrase())
    }
}
