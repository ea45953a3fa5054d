//! # icws
//! src/lib.rs
//!
//! Servidor HTTP/1.1 concurrente de contenido estático, implementado desde
//! cero para demostrar conceptos de sistemas operativos: concurrencia,
//! sincronización, backpressure y manejo de recursos.
//!
//! ## Arquitectura
//!
//! El servidor está dividido en módulos especializados:
//! - `http`: Parsing de requests, construcción de responses, status codes y MIME
//! - `server`: Acceptor TCP, cola acotada de conexiones y pool de workers
//! - `config`: Configuración inmutable resuelta una sola vez al arranque
//!
//! ## Flujo de datos
//!
//! ```text
//! Acceptor → BoundedQueue → WorkerPool → handle_connection → socket del cliente
//! ```
//!
//! ## Ejemplo de uso
//!
//! ```no_run
//! use icws::config::Config;
//! use icws::server::Server;
//!
//! let config = Config::default();
//! let server = Server::new(config);
//! server.run().expect("Error al iniciar servidor");
//! ```

pub mod http;
pub mod config;
pub mod server;
