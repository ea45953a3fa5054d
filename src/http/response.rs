//! # Construcción de Respuestas HTTP
//! src/http/response.rs
//!
//! Este módulo construye la cabecera de una respuesta y transmite el body
//! por streaming. El formato es fijo:
//!
//! ```text
//! HTTP/1.1 200 OK\r\n
//! Date: Thu, 27 Aug 2026 10:00:00 GMT\r\n
//! Server: icws\r\n
//! Connection: close\r\n
//! Content-type: text/html\r\n      <- solo si el archivo existe y la extensión es conocida
//! Content-length: 1024\r\n          <- solo si el archivo existe
//! Last-Modified: ...\r\n            <- solo si el archivo existe
//! \r\n
//! ```
//!
//! Para los errores (400, 404, 408, 501, 505) se envían únicamente la
//! status line y los tres headers base, sin entity headers.
//!
//! Todas las escrituras usan `write_all`, que drena escrituras parciales:
//! una entrega parcial es una falla de transporte, nunca un éxito.

use super::mime;
use super::StatusCode;
use std::fs::Metadata;
use std::io::{self, Read, Write};
use std::path::Path;
use std::time::SystemTime;

/// Token fijo que se envía en el header `Server`
pub const SERVER_TOKEN: &str = "icws";

/// Tamaño del buffer para streaming del body
const STREAM_BUF_SIZE: usize = 8192;

/// Headers que describen el body (solo cuando el recurso existe)
#[derive(Debug, Clone)]
pub struct EntityHeaders {
    /// Content-type resuelto por extensión; `None` si la extensión es
    /// desconocida (el header se omite, no hay tipo por defecto)
    pub content_type: Option<&'static str>,

    /// Tamaño del archivo en bytes
    pub content_length: u64,

    /// Fecha de última modificación del archivo
    pub last_modified: SystemTime,
}

impl EntityHeaders {
    /// Construye los entity headers a partir del path y su metadata
    pub fn from_metadata(path: &Path, metadata: &Metadata) -> Self {
        Self {
            content_type: mime::content_type_for_path(path),
            content_length: metadata.len(),
            last_modified: metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH),
        }
    }
}

/// Cabecera de una respuesta HTTP lista para serializar
#[derive(Debug, Clone)]
pub struct ResponseHead {
    status: StatusCode,
    entity: Option<EntityHeaders>,
}

impl ResponseHead {
    /// Crea una cabecera sin entity headers (caso de error)
    ///
    /// # Ejemplo
    /// ```
    /// use icws::http::{ResponseHead, StatusCode};
    ///
    /// let head = ResponseHead::bare(StatusCode::NotFound);
    /// let text = String::from_utf8(head.to_bytes()).unwrap();
    /// assert!(text.starts_with("HTTP/1.1 404 File Not Found\r\n"));
    /// ```
    pub fn bare(status: StatusCode) -> Self {
        Self {
            status,
            entity: None,
        }
    }

    /// Crea una cabecera con entity headers (recurso localizado)
    pub fn with_entity(status: StatusCode, entity: EntityHeaders) -> Self {
        Self {
            status,
            entity: Some(entity),
        }
    }

    /// Obtiene el código de estado de la respuesta
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Serializa la cabecera a bytes, con el orden de headers fijo
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut result = Vec::new();

        // 1. Status line: HTTP/1.1 200 OK\r\n
        let status_line = format!("HTTP/1.1 {}\r\n", self.status);
        result.extend_from_slice(status_line.as_bytes());

        // 2. Headers base, siempre presentes y en este orden
        let date = httpdate::fmt_http_date(SystemTime::now());
        result.extend_from_slice(format!("Date: {}\r\n", date).as_bytes());
        result.extend_from_slice(format!("Server: {}\r\n", SERVER_TOKEN).as_bytes());
        result.extend_from_slice(b"Connection: close\r\n");

        // 3. Entity headers, solo si el recurso fue localizado
        if let Some(entity) = &self.entity {
            if let Some(content_type) = entity.content_type {
                result.extend_from_slice(format!("Content-type: {}\r\n", content_type).as_bytes());
            }
            result.extend_from_slice(
                format!("Content-length: {}\r\n", entity.content_length).as_bytes(),
            );
            let mtime = httpdate::fmt_http_date(entity.last_modified);
            result.extend_from_slice(format!("Last-Modified: {}\r\n", mtime).as_bytes());
        }

        // 4. Línea vacía que separa headers del body
        result.extend_from_slice(b"\r\n");

        result
    }

    /// Escribe la cabecera completa en el socket
    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        out.write_all(&self.to_bytes())
    }
}

/// Transmite el body completo leyendo por chunks y drenando cada escritura.
///
/// Retorna la cantidad de bytes transmitidos.
pub fn stream_body<R: Read, W: Write>(body: &mut R, out: &mut W) -> io::Result<u64> {
    let mut buf = [0u8; STREAM_BUF_SIZE];
    let mut written: u64 = 0;

    loop {
        let n = body.read(&mut buf)?;
        if n == 0 {
            break;
        }
        out.write_all(&buf[..n])?;
        written += n as u64;
    }

    Ok(written)
}
