//! # Módulo HTTP
//! src/http/mod.rs
//!
//! Este módulo implementa el subconjunto de HTTP/1.1 que usa el servidor,
//! sin librerías de alto nivel. Incluye:
//!
//! - Parsing de requests (request line + headers)
//! - Construcción de responses con streaming del body
//! - Manejo de status codes (conjunto cerrado)
//! - Resolución de MIME types por extensión
//!
//! ### Formato de Request
//!
//! ```text
//! GET /index.html HTTP/1.1\r\n
//! Header-Name: Header-Value\r\n
//! \r\n
//! ```
//!
//! ### Formato de Response
//!
//! ```text
//! HTTP/1.1 200 OK\r\n
//! Date: Thu, 27 Aug 2026 10:00:00 GMT\r\n
//! Server: icws\r\n
//! Connection: close\r\n
//! Content-type: text/html\r\n
//! Content-length: 13\r\n
//! Last-Modified: Wed, 26 Aug 2026 09:00:00 GMT\r\n
//! \r\n
//! <html></html>
//! ```

pub mod request;   // Parsing de HTTP requests
pub mod response;  // Construcción de HTTP responses
pub mod status;    // Códigos de estado HTTP
pub mod mime;      // Tabla extensión → content-type

// Re-exportamos los tipos principales para facilitar su uso
pub use request::{ParseError, Request};
pub use response::ResponseHead;
pub use status::StatusCode;
