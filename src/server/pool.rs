//! # Pool de Workers
//! src/server/pool.rs
//!
//! Crea N threads de larga vida al arranque. Cada worker corre el mismo
//! loop: desencolar una conexión, atenderla con el handler de protocolo y
//! cerrar el socket. Los workers nunca terminan por su cuenta.
//!
//! Un error atendiendo una conexión queda aislado a esa iteración: se
//! loguea y el worker sigue con el próximo dequeue. La concurrencia
//! efectiva queda acotada al tamaño del pool.

use crate::config::Config;
use crate::server::connection;
use crate::server::queue::{BoundedQueue, ConnectionTask};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Pool fijo de workers consumiendo de la cola de conexiones
pub struct WorkerPool {
    handles: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Crea `count` workers sobre la cola dada.
    ///
    /// Si la creación de un thread falla, se reporta y el pool continúa
    /// con menos workers; el caller decide si un pool vacío es fatal.
    pub fn spawn(count: usize, queue: BoundedQueue<ConnectionTask>, config: Arc<Config>) -> Self {
        let mut handles = Vec::with_capacity(count);

        for i in 0..count {
            let queue = queue.clone();
            let config = Arc::clone(&config);
            let name = format!("worker-{}", i);

            let builder = thread::Builder::new().name(name.clone());
            match builder.spawn(move || Self::worker_loop(&name, queue, config)) {
                Ok(handle) => handles.push(handle),
                Err(e) => eprintln!("   ❌ No se pudo crear el worker {}: {}", i, e),
            }
        }

        Self { handles }
    }

    /// Loop principal del worker
    fn worker_loop(name: &str, queue: BoundedQueue<ConnectionTask>, config: Arc<Config>) {
        println!("🔧 {} started", name);

        loop {
            let task = queue.dequeue();
            let peer_addr = task.peer_addr;
            let mut stream = task.stream;

            println!("   Worker {} atiende a {}", name, peer_addr);

            if let Err(e) = connection::handle(&mut stream, &config) {
                eprintln!("   ❌ Worker {}: error de transporte con {}: {}", name, peer_addr, e);
            }

            // El drop del stream cierra la conexión en todos los caminos
        }
    }

    /// Cantidad de workers creados efectivamente
    pub fn size(&self) -> usize {
        self.handles.len()
    }

    /// Espera a que los workers terminen.
    ///
    /// Los workers no terminan por su cuenta: esto solo retorna cuando el
    /// proceso está bajando.
    pub fn join(self) {
        for handle in self.handles {
            if handle.join().is_err() {
                eprintln!("   ❌ Failed to join worker thread");
            }
        }
    }
}
