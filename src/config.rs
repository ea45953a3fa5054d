//! # Configuración del Servidor
//! src/config.rs
//!
//! Este módulo define la configuración del servidor icws con soporte para
//! argumentos CLI y variables de entorno.
//!
//! La configuración se resuelve una sola vez al arranque y se pasa de forma
//! explícita (inmutable) al servidor y a los workers. No hay estado global.
//!
//! ## Ejemplos de uso
//!
//! ### CLI
//! ```bash
//! ./icws --port 8080 --root ./www --numThreads 8 --timeout 5
//! ```
//!
//! ### Variables de entorno
//! ```bash
//! ICWS_PORT=8080 ICWS_ROOT=./www ICWS_THREADS=8 ./icws
//! ```

use clap::Parser;

/// Configuración del servidor HTTP/1.1 de contenido estático
#[derive(Debug, Clone, Parser)]
#[command(name = "icws")]
#[command(about = "Servidor HTTP/1.1 concurrente de contenido estático")]
#[command(version = "0.1.0")]
pub struct Config {
    /// Puerto en el que escucha el servidor
    #[arg(short, long, env = "ICWS_PORT")]
    pub port: u16,

    /// Host/IP en el que escucha
    #[arg(long, default_value = "0.0.0.0", env = "ICWS_HOST")]
    pub host: String,

    /// Directorio raíz desde donde se sirven los archivos
    #[arg(short, long, env = "ICWS_ROOT")]
    pub root: String,

    /// Número de workers del pool (fijo durante toda la vida del proceso)
    #[arg(short = 'n', long = "numThreads", env = "ICWS_THREADS")]
    pub num_threads: usize,

    /// Timeout de lectura por conexión, en segundos.
    /// Si no se indica, las lecturas bloquean indefinidamente.
    #[arg(short, long, env = "ICWS_TIMEOUT")]
    pub timeout: Option<u64>,

    /// Capacidad máxima de la cola de conexiones pendientes.
    /// Cuando la cola está llena el acceptor se bloquea (backpressure).
    #[arg(long = "queue-capacity", default_value = "256", env = "ICWS_QUEUE_CAPACITY")]
    pub queue_capacity: usize,
}

impl Config {
    /// Crea una nueva configuración parseando argumentos CLI.
    ///
    /// Si faltan opciones requeridas, clap imprime el usage y termina el
    /// proceso con código de error.
    pub fn new() -> Self {
        Config::parse()
    }

    /// Obtiene la dirección completa para bind (host:port)
    ///
    /// # Ejemplo
    /// ```rust
    /// use icws::config::Config;
    ///
    /// let config = Config::default();
    /// assert_eq!(config.address(), "0.0.0.0:8080");
    /// ```
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Valida la configuración
    ///
    /// Retorna errores si hay valores inválidos
    pub fn validate(&self) -> Result<(), String> {
        if self.num_threads == 0 {
            return Err("numThreads must be >= 1".to_string());
        }

        if self.queue_capacity == 0 {
            return Err("Queue capacity must be >= 1".to_string());
        }

        if let Some(timeout) = self.timeout {
            if timeout == 0 {
                return Err("Timeout must be > 0 seconds".to_string());
            }
        }

        if self.root.is_empty() {
            return Err("Root directory must not be empty".to_string());
        }

        Ok(())
    }

    /// Imprime un resumen de la configuración
    pub fn print_summary(&self) {
        println!("╔════════════════════════════════════════════╗");
        println!("║           icws Server Configuration        ║");
        println!("╚════════════════════════════════════════════╝");
        println!();
        println!("🌐 Network:");
        println!("   Address:        {}", self.address());
        println!("   Document root:  {}", self.root);
        println!();
        println!("👷 Concurrency:");
        println!("   Workers:        {}", self.num_threads);
        println!("   Queue capacity: {}", self.queue_capacity);

        match self.timeout {
            Some(secs) => println!("   Read timeout:   {} s", secs),
            None => println!("   Read timeout:   disabled"),
        }

        println!();
        println!("═════════════════════════════════════════════");
        println!();
    }
}

impl Default for Config {
    /// Configuración por defecto (usada en tests y ejemplos)
    fn default() -> Self {
        Self {
            port: 8080,
            host: "0.0.0.0".to_string(),
            root: "./www".to_string(),
            num_threads: 4,
            timeout: None,
            queue_capacity: 256,
        }
    }
}
