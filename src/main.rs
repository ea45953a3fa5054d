//! # icws - Entry Point
//! src/main.rs
//!
//! Punto de entrada del servidor. Resuelve la configuración una sola vez
//! (CLI + variables de entorno) y arranca el servidor.

use icws::config::Config;
use icws::server::Server;

fn main() {
    println!("=================================");
    println!("  icws HTTP/1.1 Static Server");
    println!("=================================\n");

    // Crear configuración desde CLI/env (clap termina el proceso si
    // faltan opciones requeridas)
    let config = Config::new();

    if let Err(e) = config.validate() {
        eprintln!("💥 Configuración inválida: {}", e);
        std::process::exit(1);
    }

    config.print_summary();

    // Crear el servidor e iniciarlo (esto bloquea el thread principal)
    let server = Server::new(config);

    if let Err(e) = server.run() {
        eprintln!("💥 Error fatal: {}", e);
        std::process::exit(1);
    }
}
