//! # Cola Acotada de Conexiones
//! src/server/queue.rs
//!
//! Implementa la cola FIFO acotada que comparten el acceptor (productor)
//! y el pool de workers (consumidores).
//!
//! La disciplina de sincronización es un mutex más dos condition
//! variables: `not_empty` despierta consumidores y `not_full` despierta
//! al productor. `enqueue` se bloquea mientras la cola está llena
//! (backpressure: una conexión aceptada jamás se pierde ni se pisa) y
//! `dequeue` se bloquea mientras está vacía.
//!
//! Internamente usa un `VecDeque` (ring buffer): enqueue y dequeue son
//! O(1) incluso bajo carga, sin el shift lineal de una cola sobre array.

use std::collections::VecDeque;
use std::net::{SocketAddr, TcpStream};
use std::sync::{Arc, Condvar, Mutex};

/// Una conexión aceptada y todavía no atendida.
///
/// Se crea en el acceptor, se mueve (no se comparte) a la cola y de ahí a
/// exactamente un worker. El socket se cierra al dropear el task, en
/// cualquier camino de salida del worker.
#[derive(Debug)]
pub struct ConnectionTask {
    /// Socket de la conexión
    pub stream: TcpStream,

    /// Dirección remota del cliente
    pub peer_addr: SocketAddr,
}

/// Cola FIFO acotada, segura para múltiples productores y consumidores
pub struct BoundedQueue<T> {
    /// Buffer interno
    items: Arc<Mutex<VecDeque<T>>>,

    /// Condvar para despertar consumidores cuando llega un item
    not_empty: Arc<Condvar>,

    /// Condvar para despertar productores cuando se libera un slot
    not_full: Arc<Condvar>,

    /// Capacidad máxima de la cola
    capacity: usize,
}

impl<T> BoundedQueue<T> {
    /// Crea una nueva cola con la capacidad indicada
    pub fn new(capacity: usize) -> Self {
        Self {
            items: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            not_empty: Arc::new(Condvar::new()),
            not_full: Arc::new(Condvar::new()),
            capacity,
        }
    }

    /// Encola un item al final.
    ///
    /// Se bloquea mientras la cola está llena; cuando hay lugar, agrega el
    /// item y despierta a un consumidor.
    pub fn enqueue(&self, item: T) {
        let mut items = self.items.lock().unwrap();

        while items.len() >= self.capacity {
            items = self.not_full.wait(items).unwrap();
        }

        items.push_back(item);

        // Notificar a un worker esperando
        self.not_empty.notify_one();
    }

    /// Desencola el item más antiguo (estricto FIFO).
    ///
    /// Se bloquea hasta que haya un item disponible.
    pub fn dequeue(&self) -> T {
        let mut items = self.items.lock().unwrap();

        loop {
            if let Some(item) = items.pop_front() {
                // Se liberó un slot: despertar a un productor bloqueado
                self.not_full.notify_one();
                return item;
            }

            items = self.not_empty.wait(items).unwrap();
        }
    }

    /// Intenta desencolar sin bloquear.
    ///
    /// Retorna `Some(item)` si había algo, `None` si la cola está vacía.
    pub fn try_dequeue(&self) -> Option<T> {
        let mut items = self.items.lock().unwrap();
        let item = items.pop_front();
        if item.is_some() {
            self.not_full.notify_one();
        }
        item
    }

    /// Retorna el tamaño actual de la cola
    pub fn len(&self) -> usize {
        let items = self.items.lock().unwrap();
        items.len()
    }

    /// Verifica si la cola está vacía
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Retorna la capacidad máxima
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl<T> Clone for BoundedQueue<T> {
    /// Clonar la cola produce otro handle al mismo estado compartido
    fn clone(&self) -> Self {
        Self {
            items: Arc::clone(&self.items),
            not_empty: Arc::clone(&self.not_empty),
            not_full: Arc::clone(&self.not_full),
            capacity: self.capacity,
        }
    }
}
