//! # Módulo del Servidor
//! src/server/mod.rs
//!
//! Este módulo implementa la mitad concurrente del servidor:
//! 1. La cola acotada de conexiones pendientes (`queue`)
//! 2. El pool fijo de workers (`pool`)
//! 3. El handler de protocolo por conexión (`connection`)
//! 4. El acceptor TCP que alimenta la cola (`tcp`)
//!
//! La cola es el único estado mutado por más de un thread; todo lo demás
//! (request, response, file handles) es propiedad exclusiva del worker que
//! atiende esa conexión.

pub mod queue;      // Cola FIFO acotada con backpressure
pub mod pool;       // Pool fijo de workers
pub mod connection; // Handler de protocolo por conexión
pub mod tcp;        // Acceptor + lifecycle del servidor

// Re-exportar para facilitar el uso
pub use pool::WorkerPool;
pub use queue::{BoundedQueue, ConnectionTask};
pub use tcp::Server;
