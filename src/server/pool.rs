//! # Pool de Workers
//! src/server/pool.rs
//!
//! Pool de threads de tamaño fijo. Todos los workers comparten una única cola
//! `mpsc` sin límite: si todos están ocupados, los jobs esperan en la cola
//! (no se rechaza nada).

use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use tracing::{debug, error};

/// Unidad de trabajo que ejecuta un worker
type Job = Box<dyn FnOnce() + Send + 'static>;

/// Pool de threads con tamaño fijado al construirlo
pub struct ThreadPool {
    workers: Vec<Worker>,
    sender: Option<Sender<Job>>,
}

struct Worker {
    id: usize,
    thread: Option<JoinHandle<()>>,
}

impl Worker {
    fn spawn(id: usize, receiver: Arc<Mutex<Receiver<Job>>>) -> std::io::Result<Self> {
        let thread = thread::Builder::new()
            .name(format!("worker-{}", id))
            .spawn(move || loop {
                // El lock se suelta antes de ejecutar el job
                let message = match receiver.lock() {
                    Ok(guard) => guard.recv(),
                    Err(_) => break,
                };

                match message {
                    Ok(job) => {
                        // Un job que hace panic no se lleva al worker con él
                        if panic::catch_unwind(AssertUnwindSafe(job)).is_err() {
                            error!(worker = id, "job terminó con panic");
                        }
                    }
                    Err(_) => {
                        debug!(worker = id, "cola cerrada, worker termina");
                        break;
                    }
                }
            })?;

        Ok(Self {
            id,
            thread: Some(thread),
        })
    }
}

impl ThreadPool {
    /// Crea un pool con `size` workers
    ///
    /// # Errores
    ///
    /// Retorna error si `size` es 0 o si el sistema no puede crear un thread.
    pub fn new(size: usize) -> std::io::Result<Self> {
        if size == 0 {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "thread pool size must be >= 1",
            ));
        }

        let (sender, receiver) = mpsc::channel();
        let receiver = Arc::new(Mutex::new(receiver));

        let workers = (0..size)
            .map(|id| Worker::spawn(id, Arc::clone(&receiver)))
            .collect::<std::io::Result<Vec<_>>>()?;

        Ok(Self {
            workers,
            sender: Some(sender),
        })
    }

    /// Encola un job; lo ejecutará el primer worker libre
    pub fn execute<F>(&self, f: F)
    where
        F: FnOnce() + Send + 'static,
    {
        if let Some(sender) = &self.sender {
            // Solo falla si todos los workers terminaron
            if sender.send(Box::new(f)).is_err() {
                error!("no quedan workers para ejecutar el job");
            }
        }
    }

    /// Número de workers
    pub fn size(&self) -> usize {
        self.workers.len()
    }
}

impl Drop for ThreadPool {
    fn drop(&mut self) {
        // Cerrar el canal hace que cada worker salga de su loop
        drop(self.sender.take());

        for worker in &mut self.workers {
            if let Some(thread) = worker.thread.take() {
                if thread.join().is_err() {
                    error!(worker = worker.id, "worker terminó con panic");
                }
            }
        }
    }
}
