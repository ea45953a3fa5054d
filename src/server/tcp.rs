//! # Servidor TCP Concurrente
//! src/server/tcp.rs
//!
//! Implementa el acceptor: un loop bloqueante que acepta conexiones y las
//! encola en la cola acotada que consume el pool de workers.
//!
//! ```text
//! Acceptor → BoundedQueue → WorkerPool → handle_connection
//! ```
//!
//! Si la cola está llena, `enqueue` bloquea al acceptor hasta que un
//! worker libere un slot (backpressure): ninguna conexión aceptada se
//! descarta en silencio.

use crate::config::Config;
use crate::server::pool::WorkerPool;
use crate::server::queue::{BoundedQueue, ConnectionTask};
use std::io;
use std::net::TcpListener;
use std::sync::Arc;

/// Servidor HTTP/1.1 de contenido estático
pub struct Server {
    config: Arc<Config>,
}

impl Server {
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Hace bind en la dirección configurada y corre para siempre.
    ///
    /// Solo retorna con error en condiciones fatales (no se pudo hacer
    /// bind, no se pudo crear ningún worker).
    pub fn run(&self) -> io::Result<()> {
        let address = self.config.address();
        println!("[*] Iniciando servidor en {}", address);

        let listener = TcpListener::bind(&address)?;
        println!("[+] Servidor escuchando en {}", address);

        self.run_on(listener)
    }

    /// Corre el servidor sobre un listener ya creado.
    ///
    /// Separado de `run` para poder levantar el servidor en un puerto
    /// efímero durante los tests.
    pub fn run_on(&self, listener: TcpListener) -> io::Result<()> {
        let queue = BoundedQueue::new(self.config.queue_capacity);
        let pool = WorkerPool::spawn(
            self.config.num_threads,
            queue.clone(),
            Arc::clone(&self.config),
        );

        if pool.size() == 0 {
            return Err(io::Error::new(
                io::ErrorKind::Other,
                "no worker threads could be created",
            ));
        }

        println!(
            "[*] Pool de {} workers listo, cola de capacidad {}\n",
            pool.size(),
            queue.capacity()
        );

        for stream in listener.incoming() {
            match stream {
                Ok(stream) => {
                    let peer_addr = match stream.peer_addr() {
                        Ok(addr) => addr,
                        Err(e) => {
                            // El cliente ya se fue; no hay nada que encolar
                            eprintln!("   ❌ Conexión sin dirección remota: {}", e);
                            continue;
                        }
                    };

                    println!("✅ Nueva conexión desde: {}", peer_addr);

                    // Bloquea si la cola está llena (backpressure)
                    queue.enqueue(ConnectionTask { stream, peer_addr });
                }
                Err(e) => {
                    eprintln!("   ❌ Error al aceptar conexión: {}", e);
                }
            }
        }

        // Solo alcanzable cuando el listener deja de producir conexiones
        pool.join();
        Ok(())
    }
}
