//! # Resolución de MIME Types
//! src/http/mime.rs
//!
//! Tabla cerrada extensión → content-type. Una extensión desconocida
//! retorna `None` y la respuesta simplemente omite el header
//! `Content-type`; no hay tipo por defecto.

use std::path::Path;

/// Resuelve el content-type para una extensión de archivo.
///
/// La comparación es case-insensitive (`HTML` y `html` son equivalentes).
///
/// # Ejemplo
/// ```
/// use icws::http::mime;
///
/// assert_eq!(mime::content_type("css"), Some("text/css"));
/// assert_eq!(mime::content_type("xyz"), None);
/// ```
pub fn content_type(extension: &str) -> Option<&'static str> {
    match extension.to_ascii_lowercase().as_str() {
        "html" => Some("text/html"),
        "css" => Some("text/css"),
        "txt" => Some("text/plain"),
        "js" => Some("text/javascript"),
        "jpg" | "jpeg" => Some("image/jpg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        _ => None,
    }
}

/// Resuelve el content-type a partir de la extensión de un path.
///
/// Un path sin extensión retorna `None`.
pub fn content_type_for_path(path: &Path) -> Option<&'static str> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .and_then(content_type)
}
