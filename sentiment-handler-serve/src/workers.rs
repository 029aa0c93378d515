use std::collections::VecDeque;
use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};

/// Task for the inference worker.
pub(crate) struct InferenceTask<I, O> {
    /// The request to process.
    pub req: I,
    /// The response sender.
    pub resp_tx: oneshot::Sender<O>,
}

/// State for the inference task.
pub(crate) struct InferenceState<I, O> {
    pub tx: mpsc::Sender<InferenceTask<I, O>>,
}

// Derived `Clone` would require `I: Clone` and `O: Clone`
impl<I, O> Clone for InferenceState<I, O> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

/// Function signature for processing inference tasks.
pub(crate) type ProcessFn<P, I, O> = dyn Fn(&P, I) -> O + Send + Sync;

/// Distributes inference tasks to worker tasks that process them using the provided function. The
/// handler is shared between the workers through an `Arc`.
///
/// # Arguments
///
/// * `rx` - Receiver for incoming inference tasks.
/// * `handler` - The handler that is going to be used to process the tasks.
/// * `num_workers` - The number of worker tasks to spawn.
/// * `process_fn` - The function that processes the inference task.
pub(crate) async fn task_distributor<P, I, O>(
    mut rx: mpsc::Receiver<InferenceTask<I, O>>,
    handler: Arc<P>,
    num_workers: usize,
    process_fn: Arc<ProcessFn<P, I, O>>,
) where
    P: Send + Sync + 'static,
    I: Send + 'static,
    O: Send + 'static,
{
    tracing::info!("Starting task distributor with {} workers", num_workers);
    let mut workers = Vec::new();
    let (worker_tx, mut worker_rx) = mpsc::channel(num_workers.max(1));

    // Spawn worker tasks
    for id in 0..num_workers {
        let handle = tokio::spawn(worker_loop(
            id,
            Arc::clone(&handler),
            worker_tx.clone(),
            Arc::clone(&process_fn),
        ));
        workers.push(handle);
    }
    drop(worker_tx);

    // Waiting tasks are dispatched in arrival order
    let mut tasks = VecDeque::new();
    let mut available_workers: Vec<mpsc::Sender<InferenceTask<I, O>>> = Vec::new();

    loop {
        tokio::select! {
            task = rx.recv() => {
                match task {
                    Some(task) => {
                        if let Some(worker) = available_workers.pop() {
                            if worker.send(task).await.is_err() {
                                tracing::error!("Failed to send task to worker");
                            }
                        } else {
                            tasks.push_back(task);
                        }
                    }
                    None => {
                        // Channel closed, no more tasks will be coming
                        break;
                    }
                }
            }
            worker = worker_rx.recv() => {
                match worker {
                    Some(worker) => {
                        if let Some(task) = tasks.pop_front() {
                            if worker.send(task).await.is_err() {
                                tracing::error!("Failed to send task to worker");
                            }
                        } else {
                            available_workers.push(worker);
                        }
                    }
                    None => {
                        // All workers have exited
                        break;
                    }
                }
            }
        }
    }

    // Idle workers wait on a channel they also hold a sender of, so they are stopped explicitly
    for worker in workers {
        worker.abort();
    }
    tracing::info!("Task distributor stopped");
}

/// Worker task that processes inference tasks using the provided function.
///
/// # Arguments
///
/// * `id` - Worker task identifier.
/// * `handler` - The handler that is going to be used to process the tasks.
/// * `worker_tx` - Sender to communicate with the task distributor.
/// * `process_fn` - The function that processes the inference task.
async fn worker_loop<P, I, O>(
    id: usize,
    handler: Arc<P>,
    worker_tx: mpsc::Sender<mpsc::Sender<InferenceTask<I, O>>>,
    process_fn: Arc<ProcessFn<P, I, O>>,
) where
    P: Send + Sync + 'static,
    I: Send + 'static,
    O: Send + 'static,
{
    let (task_tx, mut task_rx) = mpsc::channel(1);

    loop {
        if worker_tx.send(task_tx.clone()).await.is_err() {
            break;
        }

        if let Some(task) = task_rx.recv().await {
            let result = process_fn(&handler, task.req);
            if task.resp_tx.send(result).is_err() {
                tracing::error!("Worker {} failed to send response", id);
            }
        } else {
            break;
        }
    }
    tracing::debug!("Worker {} stopped", id);
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::time::Duration;

    use super::*;

    struct Multiplier(u64);

    fn multiply(multiplier: &Multiplier, value: u64) -> u64 {
        multiplier.0 * value
    }

    async fn submit(state: &InferenceState<u64, u64>, value: u64) -> u64 {
        let (resp_tx, resp_rx) = oneshot::channel();
        state
            .tx
            .send(InferenceTask { req: value, resp_tx })
            .await
            .unwrap();
        resp_rx.await.unwrap()
    }

    #[tokio::test]
    async fn test_tasks_are_processed() {
        let (tx, rx) = mpsc::channel(8);
        let distributor = tokio::spawn(task_distributor::<Multiplier, u64, u64>(
            rx,
            Arc::new(Multiplier(3)),
            2,
            Arc::new(multiply),
        ));
        let state = InferenceState { tx };

        for value in 0..10 {
            assert_eq!(submit(&state, value).await, value * 3);
        }

        drop(state);
        distributor.await.unwrap();
    }

    #[tokio::test]
    async fn test_concurrent_requests() {
        let (tx, rx) = mpsc::channel(8);
        tokio::spawn(task_distributor::<Multiplier, u64, u64>(
            rx,
            Arc::new(Multiplier(2)),
            3,
            Arc::new(multiply),
        ));
        let state = InferenceState { tx };

        let handles: Vec<_> = (0..20)
            .map(|value| {
                let state = state.clone();
                tokio::spawn(async move { (value, submit(&state, value).await) })
            })
            .collect();
        for handle in handles {
            let (value, result) = handle.await.unwrap();
            assert_eq!(result, value * 2);
        }
    }

    struct SlowRecorder {
        seen: Mutex<Vec<u64>>,
    }

    fn record_slowly(recorder: &SlowRecorder, value: u64) -> u64 {
        recorder.seen.lock().unwrap().push(value);
        std::thread::sleep(Duration::from_millis(100));
        value
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_waiting_tasks_are_served_in_arrival_order() {
        let recorder = Arc::new(SlowRecorder {
            seen: Mutex::new(Vec::new()),
        });
        let (tx, rx) = mpsc::channel(8);
        tokio::spawn(task_distributor::<SlowRecorder, u64, u64>(
            rx,
            Arc::clone(&recorder),
            1,
            Arc::new(record_slowly),
        ));
        let state = InferenceState { tx };

        let mut handles = Vec::new();
        for value in 0..5 {
            let state = state.clone();
            handles.push(tokio::spawn(async move { submit(&state, value).await }));
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        for (value, handle) in handles.into_iter().enumerate() {
            assert_eq!(handle.await.unwrap(), value as u64);
        }

        assert_eq!(*recorder.seen.lock().unwrap(), vec![0, 1, 2, 3, 4]);
    }
}
