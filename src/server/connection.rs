//! # Manejo de una Conexión
//! src/server/connection.rs
//!
//! Implementa el handler de protocolo que un worker ejecuta por cada
//! conexión desencolada: leer la cabecera, parsear, validar la versión,
//! rutear por método y responder.
//!
//! ```text
//! AwaitRequestLine → AwaitHeaders → Validate → Route → Respond → Closed
//! ```
//!
//! El handler solo escribe bytes: el cierre del socket es responsabilidad
//! del worker que lo invoca (drop del stream en todos los caminos).
//! Todos los errores de protocolo terminan en una respuesta con su status;
//! solo las fallas de transporte se propagan como `io::Error`.

use crate::config::Config;
use crate::http::response::{self, EntityHeaders};
use crate::http::{Request, ResponseHead, StatusCode};
use std::fs::File;
use std::io::{self, BufRead, BufReader, ErrorKind, Read, Write};
use std::net::TcpStream;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Tamaño máximo de la cabecera de un request (request line + headers).
/// Una cabecera más grande se responde con 400.
const MAX_HEAD_BYTES: usize = 8192;

/// Máximo de bytes que se drenan de una cabecera sobredimensionada antes
/// de cortar la conexión sin terminar de leerla
const DRAIN_LIMIT: usize = 64 * 1024;

/// Resultado de leer la cabecera de un request
enum HeadRead {
    /// El cliente cerró sin mandar nada
    Closed,

    /// Cabecera completa, hasta la línea en blanco
    Complete(Vec<u8>),

    /// La cabecera excede `MAX_HEAD_BYTES`
    TooLarge,
}

/// Atiende una conexión completa: lee el request, lo resuelve y escribe
/// la respuesta. Loguea método, URI, status y latencia al terminar.
pub fn handle(stream: &mut TcpStream, config: &Config) -> io::Result<()> {
    let started = Instant::now();

    if let Some(secs) = config.timeout {
        stream.set_read_timeout(Some(Duration::from_secs(secs)))?;
    }

    let head = {
        let mut reader = BufReader::new(&mut *stream);
        read_head(&mut reader)
    };

    let head = match head {
        Ok(HeadRead::Complete(bytes)) => bytes,
        Ok(HeadRead::Closed) => {
            println!("   Conexión cerrada sin datos");
            return Ok(());
        }
        Ok(HeadRead::TooLarge) => {
            return respond_error(stream, StatusCode::BadRequest, started);
        }
        Err(e) if is_timeout(&e) => {
            return respond_error(stream, StatusCode::RequestTimeout, started);
        }
        Err(e) => return Err(e),
    };

    // Parsing: sin estado compartido, cada worker parsea en paralelo
    let request = match Request::parse(&head) {
        Ok(request) => request,
        Err(e) => {
            println!("   Parse error: {}", e);
            return respond_error(stream, StatusCode::BadRequest, started);
        }
    };

    // Validate: solo HTTP/1.1, comparación case-insensitive
    if !request.version().eq_ignore_ascii_case("HTTP/1.1") {
        let status = StatusCode::VersionNotSupported;
        ResponseHead::bare(status).write_to(stream)?;
        stream.flush()?;
        log_served(request.method(), request.uri(), status, started);
        return Ok(());
    }

    // Route: GET y HEAD resuelven su propia URI; el resto es 501
    let status = match request.method() {
        "GET" => respond_file(stream, &config.root, request.uri(), false)?,
        "HEAD" => respond_file(stream, &config.root, request.uri(), true)?,
        _ => {
            ResponseHead::bare(StatusCode::NotImplemented).write_to(stream)?;
            stream.flush()?;
            StatusCode::NotImplemented
        }
    };

    log_served(request.method(), request.uri(), status, started);
    Ok(())
}

/// Lee la cabecera línea por línea hasta la línea en blanco o EOF.
///
/// Si la cabecera excede `MAX_HEAD_BYTES`, las líneas restantes se drenan
/// y descartan (hasta `DRAIN_LIMIT`) antes de reportar `TooLarge`. Cada
/// lectura pasa por un `Take` con el presupuesto restante: una línea sin
/// `\n` nunca acumula más de `DRAIN_LIMIT` bytes en memoria.
fn read_head<R: BufRead>(reader: &mut R) -> io::Result<HeadRead> {
    let mut head = Vec::new();
    let mut drained = 0usize;
    let mut too_large = false;

    loop {
        let line_start = head.len();
        let mut limited = (&mut *reader).take((DRAIN_LIMIT - drained) as u64);
        let n = limited.read_until(b'\n', &mut head)?;
        let budget_spent = limited.limit() == 0;

        if n == 0 {
            // EOF antes de la línea en blanco
            break;
        }
        drained += n;

        if head.last() != Some(&b'\n') {
            if budget_spent {
                // Línea interminable: se agotó el presupuesto sin ver `\n`
                return Ok(HeadRead::TooLarge);
            }
            // EOF a mitad de línea: la próxima lectura retorna 0
            continue;
        }

        let is_blank = {
            let line = &head[line_start..];
            line == b"\r\n" || line == b"\n"
        };

        if too_large {
            head.truncate(line_start);
        } else if head.len() > MAX_HEAD_BYTES {
            too_large = true;
        }

        if is_blank {
            break;
        }

        if drained >= DRAIN_LIMIT {
            return Ok(HeadRead::TooLarge);
        }
    }

    if too_large {
        Ok(HeadRead::TooLarge)
    } else if head.is_empty() {
        Ok(HeadRead::Closed)
    } else {
        Ok(HeadRead::Complete(head))
    }
}

/// Resuelve una URI a un path bajo el root configurado.
///
/// `/` mapea a `index.html`. Cualquier URI con un segmento `..` se rechaza
/// antes de tocar el filesystem: no hay forma de escapar del root.
fn resolve_path(root: &str, uri: &str) -> Option<PathBuf> {
    let uri = if uri == "/" { "/index.html" } else { uri };

    if uri.split('/').any(|segment| segment == "..") {
        return None;
    }

    Some(Path::new(root).join(uri.trim_start_matches('/')))
}

/// Responde un GET o HEAD: 200 con entity headers (y body para GET) si el
/// archivo existe, 404 con headers base si no.
fn respond_file(
    stream: &mut TcpStream,
    root: &str,
    uri: &str,
    head_only: bool,
) -> io::Result<StatusCode> {
    let not_found = |stream: &mut TcpStream| -> io::Result<StatusCode> {
        ResponseHead::bare(StatusCode::NotFound).write_to(stream)?;
        stream.flush()?;
        Ok(StatusCode::NotFound)
    };

    let Some(path) = resolve_path(root, uri) else {
        return not_found(stream);
    };

    let mut file = match File::open(&path) {
        Ok(file) => file,
        Err(_) => return not_found(stream),
    };

    let metadata = match file.metadata() {
        Ok(metadata) => metadata,
        Err(_) => return not_found(stream),
    };
    if !metadata.is_file() {
        // Un directorio abre bien en Unix pero no es un recurso servible
        return not_found(stream);
    }

    let entity = EntityHeaders::from_metadata(&path, &metadata);
    ResponseHead::with_entity(StatusCode::Ok, entity).write_to(stream)?;

    if !head_only {
        response::stream_body(&mut file, stream)?;
    }

    stream.flush()?;
    Ok(StatusCode::Ok)
}

/// Responde un error sin entity headers y lo loguea
fn respond_error(stream: &mut TcpStream, status: StatusCode, started: Instant) -> io::Result<()> {
    ResponseHead::bare(status).write_to(stream)?;
    stream.flush()?;
    log_served("-", "-", status, started);
    Ok(())
}

fn log_served(method: &str, uri: &str, status: StatusCode, started: Instant) {
    let latency = started.elapsed();
    println!(
        "   {} {} → {} ({:.2} ms)",
        method,
        uri,
        status,
        latency.as_secs_f64() * 1000.0
    );
}

fn is_timeout(e: &io::Error) -> bool {
    matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Read;
    use std::net::{Shutdown, TcpListener};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    static DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

    /// Helper: crea un par de streams conectados (cliente, servidor)
    fn socket_pair() -> (TcpStream, TcpStream) {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let addr = listener.local_addr().unwrap();
        let client = TcpStream::connect(addr).unwrap();
        let (server, _) = listener.accept().unwrap();
        (client, server)
    }

    /// Helper: crea un directorio root temporal con los archivos dados
    fn temp_root(files: &[(&str, &[u8])]) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "icws-conn-test-{}-{}",
            std::process::id(),
            DIR_COUNTER.fetch_add(1, Ordering::SeqCst)
        ));
        fs::create_dir_all(&dir).unwrap();
        for (name, contents) in files {
            fs::write(dir.join(name), contents).unwrap();
        }
        dir
    }

    /// Helper: atiende un request crudo contra un root y retorna la
    /// respuesta completa como texto
    fn run_request(root: &Path, raw: &[u8]) -> String {
        let (mut client, mut server) = socket_pair();
        let mut config = Config::default();
        config.root = root.to_string_lossy().to_string();

        let handler = thread::spawn(move || {
            let _ = handle(&mut server, &config);
        });

        client.write_all(raw).unwrap();
        client.shutdown(Shutdown::Write).unwrap();

        let mut response = String::new();
        client.read_to_string(&mut response).unwrap();
        handler.join().unwrap();
        response
    }

    fn extract_body(response: &str) -> &str {
        match response.find("\r\n\r\n") {
            Some(pos) => &response[pos + 4..],
            None => "",
        }
    }

    #[test]
    fn test_get_index_via_root_uri() {
        let body = b"<html>hola</html>";
        let root = temp_root(&[("index.html", body)]);

        let response = run_request(&root, b"GET / HTTP/1.1\r\n\r\n");

        assert!(response.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(response.contains("Content-type: text/html\r\n"));
        assert!(response.contains(&format!("Content-length: {}\r\n", body.len())));
        assert!(response.contains("Last-Modified: "));
        assert_eq!(extract_body(&response), "<html>hola</html>");
    }

    #[test]
    fn test_get_missing_file_is_404_without_entity_headers() {
        let root = temp_root(&[("index.html", b"x")]);

        let response = run_request(&root, b"GET /missing.png HTTP/1.1\r\n\r\n");

        assert!(response.starts_with("HTTP/1.1 404 File Not Found\r\n"));
        assert!(!response.contains("Content-type"));
        assert!(!response.contains("Content-length"));
        assert!(!response.contains("Last-Modified"));
        assert_eq!(extract_body(&response), "");
    }

    #[test]
    fn test_post_is_501() {
        let root = temp_root(&[("index.html", b"x")]);

        let response = run_request(&root, b"POST / HTTP/1.1\r\n\r\n");

        assert!(response.starts_with("HTTP/1.1 501 Unsupported Methods\r\n"));
    }

    #[test]
    fn test_lowercase_method_is_501() {
        // Los métodos HTTP son case-sensitive: "get" no es GET
        let root = temp_root(&[("index.html", b"x")]);

        let response = run_request(&root, b"get / HTTP/1.1\r\n\r\n");

        assert!(response.starts_with("HTTP/1.1 501 Unsupported Methods\r\n"));
    }

    #[test]
    fn test_http10_is_505() {
        let root = temp_root(&[("index.html", b"x")]);

        let response = run_request(&root, b"GET / HTTP/1.0\r\n\r\n");

        assert!(response.starts_with("HTTP/1.1 505 HTTP Version Not Supported\r\n"));
    }

    #[test]
    fn test_version_check_is_case_insensitive() {
        let root = temp_root(&[("index.html", b"ok")]);

        let response = run_request(&root, b"GET / http/1.1\r\n\r\n");

        assert!(response.starts_with("HTTP/1.1 200 OK\r\n"));
    }

    #[test]
    fn test_malformed_request_line_is_400() {
        let root = temp_root(&[]);

        let response = run_request(&root, b"garbage\r\n\r\n");

        assert!(response.starts_with("HTTP/1.1 400 Bad Request\r\n"));
    }

    #[test]
    fn test_malformed_header_is_400() {
        let root = temp_root(&[("index.html", b"x")]);

        let response = run_request(&root, b"GET / HTTP/1.1\r\nsin dos puntos\r\n\r\n");

        assert!(response.starts_with("HTTP/1.1 400 Bad Request\r\n"));
    }

    #[test]
    fn test_head_sends_headers_without_body() {
        let body = b"<html>contenido</html>";
        let root = temp_root(&[("index.html", body)]);

        let response = run_request(&root, b"HEAD / HTTP/1.1\r\n\r\n");

        assert!(response.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(response.contains("Content-type: text/html\r\n"));
        assert!(response.contains(&format!("Content-length: {}\r\n", body.len())));
        // Cabecera completa pero sin body
        assert!(response.ends_with("\r\n\r\n"));
        assert_eq!(extract_body(&response), "");
    }

    #[test]
    fn test_css_content_type() {
        let root = temp_root(&[("style.css", b"body { color: red; }")]);

        let response = run_request(&root, b"GET /style.css HTTP/1.1\r\n\r\n");

        assert!(response.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(response.contains("Content-type: text/css\r\n"));
    }

    #[test]
    fn test_unknown_extension_omits_content_type() {
        let root = temp_root(&[("data.xyz", b"opaque")]);

        let response = run_request(&root, b"GET /data.xyz HTTP/1.1\r\n\r\n");

        assert!(response.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(!response.contains("Content-type"));
        assert!(response.contains("Content-length: 6\r\n"));
        assert_eq!(extract_body(&response), "opaque");
    }

    #[test]
    fn test_traversal_is_rejected() {
        let root = temp_root(&[("index.html", b"x")]);
        // secret.txt vive fuera del root
        let parent = root.parent().unwrap();
        fs::write(parent.join("secret-icws.txt"), b"privado").unwrap();

        let response = run_request(&root, b"GET /../secret-icws.txt HTTP/1.1\r\n\r\n");

        assert!(response.starts_with("HTTP/1.1 404 File Not Found\r\n"));
        assert!(!response.contains("privado"));
    }

    #[test]
    fn test_get_directory_is_404() {
        let root = temp_root(&[]);
        fs::create_dir_all(root.join("subdir")).unwrap();

        let response = run_request(&root, b"GET /subdir HTTP/1.1\r\n\r\n");

        assert!(response.starts_with("HTTP/1.1 404 File Not Found\r\n"));
    }

    #[test]
    fn test_closed_without_data_sends_nothing() {
        let root = temp_root(&[]);

        let response = run_request(&root, b"");

        assert_eq!(response, "");
    }

    #[test]
    fn test_oversized_head_is_400() {
        let root = temp_root(&[("index.html", b"x")]);

        let mut raw = b"GET / HTTP/1.1\r\n".to_vec();
        // Headers válidos pero muy por encima del límite de 8192 bytes
        for i in 0..400 {
            raw.extend_from_slice(format!("X-Filler-{}: {}\r\n", i, "a".repeat(40)).as_bytes());
        }
        raw.extend_from_slice(b"\r\n");

        let response = run_request(&root, &raw);

        assert!(response.starts_with("HTTP/1.1 400 Bad Request\r\n"));
    }

    #[test]
    fn test_newline_free_flood_is_400() {
        // Una "línea" sin `\n` no puede acumular bytes sin límite
        let root = temp_root(&[("index.html", b"x")]);
        let raw = vec![b'a'; DRAIN_LIMIT];

        let response = run_request(&root, &raw);

        assert!(response.starts_with("HTTP/1.1 400 Bad Request\r\n"));
    }

    #[test]
    fn test_newline_free_head_reads_at_most_drain_limit() {
        let mut reader = io::Cursor::new(vec![b'a'; DRAIN_LIMIT + 4096]);

        let result = read_head(&mut reader).unwrap();

        assert!(matches!(result, HeadRead::TooLarge));
        assert!(reader.position() as usize <= DRAIN_LIMIT);
    }

    #[test]
    fn test_endless_header_line_terminates() {
        // Un stream infinito de un solo carácter debe cortarse en TooLarge
        let mut reader = BufReader::new(io::repeat(b'x'));

        let result = read_head(&mut reader).unwrap();

        assert!(matches!(result, HeadRead::TooLarge));
    }

    #[test]
    fn test_eof_mid_line_keeps_partial_head() {
        let mut reader = io::Cursor::new(b"GET / HT".to_vec());

        match read_head(&mut reader).unwrap() {
            HeadRead::Complete(head) => assert_eq!(head, b"GET / HT"),
            _ => panic!("se esperaba Complete"),
        }
    }

    #[test]
    fn test_get_path_through_file_is_404() {
        // Usar un archivo existente como directorio intermedio falla el
        // open y cae al mismo 404 que cualquier falla de stat
        let root = temp_root(&[("index.html", b"x")]);

        let response = run_request(&root, b"GET /index.html/extra HTTP/1.1\r\n\r\n");

        assert!(response.starts_with("HTTP/1.1 404 File Not Found\r\n"));
    }

    #[test]
    fn test_read_timeout_responds_408() {
        let (mut client, mut server) = socket_pair();
        let mut config = Config::default();
        config.timeout = Some(1);

        let handler = thread::spawn(move || {
            let _ = handle(&mut server, &config);
        });

        // Cabecera incompleta y el cliente se queda callado
        client.write_all(b"GET / HT").unwrap();

        let mut response = String::new();
        client.read_to_string(&mut response).unwrap();
        handler.join().unwrap();

        assert!(response.starts_with("HTTP/1.1 408 Connection Timeouts\r\n"));
        assert!(!response.contains("Content-length"));
    }

    // ==================== resolve_path ====================

    #[test]
    fn test_resolve_path_root_maps_to_index() {
        let path = resolve_path("/www", "/").unwrap();
        assert_eq!(path, Path::new("/www/index.html"));
    }

    #[test]
    fn test_resolve_path_plain_uri() {
        let path = resolve_path("/www", "/images/logo.png").unwrap();
        assert_eq!(path, Path::new("/www/images/logo.png"));
    }

    #[test]
    fn test_resolve_path_rejects_dotdot() {
        assert_eq!(resolve_path("/www", "/../etc/passwd"), None);
        assert_eq!(resolve_path("/www", "/a/../../etc/passwd"), None);
        assert_eq!(resolve_path("/www", "/.."), None);
    }

    #[test]
    fn test_resolve_path_allows_dotted_names() {
        // ".." como segmento es escape; "..algo" como nombre no lo es
        let path = resolve_path("/www", "/..hidden.html").unwrap();
        assert_eq!(path, Path::new("/www/..hidden.html"));
    }
}
