//! Fixed-size worker pool with a single drain barrier

use std::any::Any;
use std::cell::Cell;
use std::collections::VecDeque;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicU8, AtomicUsize, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};

use crossbeam::utils::{Backoff, CachePadded};

use crate::config::PhysicsConfig;
use super::{TaskError, TaskFailure};

/// Identifier handed out when a task is queued
pub type TaskId = u64;

type Job = Box<dyn FnOnce() -> Result<(), String> + Send + 'static>;

thread_local! {
    static WORKER_INDEX: Cell<Option<usize>> = const { Cell::new(None) };
}

/// Lifecycle of one worker thread
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum WorkerState {
    /// Blocked until the next `execute` releases the barrier
    WaitingForBarrier = 0,
    /// Pulling tasks off the queue
    Draining = 1,
    /// Exited after `dispose`
    Terminated = 2,
}

impl WorkerState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::WaitingForBarrier,
            1 => Self::Draining,
            _ => Self::Terminated,
        }
    }
}

struct QueuedTask {
    id: TaskId,
    label: Option<String>,
    job: Job,
}

/// Barrier state guarded by one mutex
struct Release {
    generation: u64,
    shutdown: bool,
}

/// State shared between the manager and its workers
struct Shared {
    queue: Mutex<VecDeque<QueuedTask>>,
    release: Mutex<Release>,
    release_signal: Condvar,
    idle: CachePadded<AtomicUsize>,
    failures: Mutex<Vec<TaskFailure>>,
    states: Vec<AtomicU8>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    // Tasks run outside every lock, so a poisoned lock still holds valid data
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "task panicked".to_string()
    }
}

impl Shared {
    fn set_state(&self, worker: usize, state: WorkerState) {
        self.states[worker].store(state as u8, Ordering::Release);
    }

    fn worker_loop(&self, index: usize) {
        WORKER_INDEX.with(|slot| slot.set(Some(index)));
        let mut seen_generation = 0;

        loop {
            {
                let mut release = lock(&self.release);
                while release.generation == seen_generation && !release.shutdown {
                    release = self
                        .release_signal
                        .wait(release)
                        .unwrap_or_else(PoisonError::into_inner);
                }
                // A released barrier is always drained, even if shutdown was
                // requested in the meantime, so `execute` sees every idle report.
                if release.generation == seen_generation {
                    break;
                }
                seen_generation = release.generation;
            }

            self.set_state(index, WorkerState::Draining);
            self.drain();
            self.set_state(index, WorkerState::WaitingForBarrier);
            self.idle.fetch_add(1, Ordering::AcqRel);
        }

        self.set_state(index, WorkerState::Terminated);
        log::trace!("Task worker {index} terminated");
    }

    fn drain(&self) {
        loop {
            let task = lock(&self.queue).pop_front();
            match task {
                Some(task) => self.run(task),
                None => return,
            }
        }
    }

    fn run(&self, task: QueuedTask) {
        let QueuedTask { id, label, job } = task;
        let message = match panic::catch_unwind(AssertUnwindSafe(job)) {
            Ok(Ok(())) => return,
            Ok(Err(message)) => message,
            Err(payload) => panic_message(payload.as_ref()),
        };

        let failure = TaskFailure { task_id: id, label, message };
        log::warn!("Unhandled failure in {failure}");
        lock(&self.failures).push(failure);
    }
}

/// Fixed-size thread pool that runs queued tasks behind a single barrier.
///
/// The calling thread of [`execute`](Self::execute) counts as one of the
/// pool's threads: it releases the workers and polls until they are done, so
/// a pool of `thread_count` threads spawns `thread_count - 1` workers (at
/// least one). The caller never runs tasks itself; only the workers do, so at
/// most `worker_count()` tasks run at once.
///
/// Tasks can only be queued between calls to `execute`. Queuing while an
/// `execute` is in flight, including from inside a running task, fails with
/// [`TaskError::AlreadyExecuting`].
///
/// ```rust,no_run
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
/// use physics_core::tasks::TaskManager;
///
/// let manager = TaskManager::new(4)?;
/// let counter = Arc::new(AtomicUsize::new(0));
/// for _ in 0..16 {
///     let counter = Arc::clone(&counter);
///     manager.add_task(move || {
///         counter.fetch_add(1, Ordering::Relaxed);
///     })?;
/// }
/// manager.execute()?;
/// assert_eq!(counter.load(Ordering::Relaxed), 16);
/// # Ok::<(), physics_core::tasks::TaskError>(())
/// ```
pub struct TaskManager {
    shared: Arc<Shared>,
    workers: Mutex<Vec<JoinHandle<()>>>,
    thread_count: usize,
    running: CachePadded<AtomicBool>,
    disposed: AtomicBool,
    next_task_id: AtomicU64,
}

impl TaskManager {
    /// Create a pool of `thread_count` threads (including the executing thread)
    pub fn new(thread_count: usize) -> Result<Self, TaskError> {
        debug_assert!(thread_count > 0, "thread count must be at least 1");
        let thread_count = thread_count.max(1);
        let worker_count = (thread_count - 1).max(1);

        let shared = Arc::new(Shared {
            queue: Mutex::new(VecDeque::new()),
            release: Mutex::new(Release { generation: 0, shutdown: false }),
            release_signal: Condvar::new(),
            idle: CachePadded::new(AtomicUsize::new(0)),
            failures: Mutex::new(Vec::new()),
            states: (0..worker_count)
                .map(|_| AtomicU8::new(WorkerState::WaitingForBarrier as u8))
                .collect(),
        });

        let manager = Self {
            shared,
            workers: Mutex::new(Vec::with_capacity(worker_count)),
            thread_count,
            running: CachePadded::new(AtomicBool::new(false)),
            disposed: AtomicBool::new(false),
            next_task_id: AtomicU64::new(0),
        };

        for index in 0..worker_count {
            let shared = Arc::clone(&manager.shared);
            let handle = thread::Builder::new()
                .name(format!("physics-task-{index}"))
                .spawn(move || shared.worker_loop(index))?;
            lock(&manager.workers).push(handle);
        }

        log::info!("Task manager started: {thread_count} threads, {worker_count} workers");
        Ok(manager)
    }

    /// Create a pool sized to the logical processor count
    pub fn with_default_threads() -> Result<Self, TaskError> {
        Self::from_config(&PhysicsConfig::default())
    }

    /// Create a pool sized from configuration
    pub fn from_config(config: &PhysicsConfig) -> Result<Self, TaskError> {
        Self::new(config.resolved_thread_count())
    }

    /// Total thread count, including the thread that calls `execute`
    pub fn thread_count(&self) -> usize {
        self.thread_count
    }

    /// Number of spawned worker threads
    pub fn worker_count(&self) -> usize {
        self.shared.states.len()
    }

    /// Index of the calling worker thread, or `None` off the pool
    pub fn current_thread_index() -> Option<usize> {
        WORKER_INDEX.with(Cell::get)
    }

    /// Snapshot of every worker's state
    pub fn worker_states(&self) -> Vec<WorkerState> {
        self.shared
            .states
            .iter()
            .map(|state| WorkerState::from_u8(state.load(Ordering::Acquire)))
            .collect()
    }

    /// Number of tasks waiting for the next `execute`
    pub fn pending_tasks(&self) -> usize {
        lock(&self.shared.queue).len()
    }

    /// Queue a task for the next `execute`
    pub fn add_task<F>(&self, task: F) -> Result<TaskId, TaskError>
    where
        F: FnOnce() + Send + 'static,
    {
        self.enqueue(None, Box::new(move || {
            task();
            Ok(())
        }))
    }

    /// Queue a task together with the parameters it is called with
    pub fn add_task_with<P, F>(&self, params: P, task: F) -> Result<TaskId, TaskError>
    where
        P: Send + 'static,
        F: FnOnce(P) + Send + 'static,
    {
        self.enqueue(None, Box::new(move || {
            task(params);
            Ok(())
        }))
    }

    /// Queue a labelled task whose error is reported as a [`TaskFailure`]
    pub fn add_fallible_task<F, E>(&self, label: impl Into<String>, task: F) -> Result<TaskId, TaskError>
    where
        F: FnOnce() -> Result<(), E> + Send + 'static,
        E: fmt::Display,
    {
        self.enqueue(Some(label.into()), Box::new(move || task().map_err(|e| e.to_string())))
    }

    fn enqueue(&self, label: Option<String>, job: Job) -> Result<TaskId, TaskError> {
        if self.disposed.load(Ordering::Acquire) {
            return Err(TaskError::Disposed);
        }
        // Read under the queue lock so a task is either seen by the next
        // drain or rejected, never queued behind a finished drain.
        let mut queue = lock(&self.shared.queue);
        if self.running.load(Ordering::Acquire) {
            return Err(TaskError::AlreadyExecuting);
        }
        let id = self.next_task_id.fetch_add(1, Ordering::Relaxed);
        queue.push_back(QueuedTask { id, label, job });
        Ok(id)
    }

    /// Run every queued task to completion, then clear the queue.
    ///
    /// Blocks until all workers have drained the queue. Task panics and errors
    /// do not stop the drain; they are collected and returned together as
    /// [`TaskError::TaskFailures`] once every task has run.
    pub fn execute(&self) -> Result<(), TaskError> {
        if self.disposed.load(Ordering::Acquire) {
            return Err(TaskError::Disposed);
        }
        if self
            .running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(TaskError::AlreadyExecuting);
        }
        let _running = RunningGuard(&self.running);

        if lock(&self.shared.queue).is_empty() {
            return Ok(());
        }

        let worker_count = self.worker_count();
        self.shared.idle.store(0, Ordering::Release);
        {
            // Checked under the same lock `dispose` takes to stop the workers:
            // a generation bumped here is always drained before they exit.
            let mut release = lock(&self.shared.release);
            if release.shutdown {
                return Err(TaskError::Disposed);
            }
            release.generation += 1;
        }
        self.shared.release_signal.notify_all();

        let backoff = Backoff::new();
        while self.shared.idle.load(Ordering::Acquire) < worker_count {
            backoff.snooze();
        }

        let dropped = {
            let mut queue = lock(&self.shared.queue);
            let dropped = queue.len();
            queue.clear();
            dropped
        };
        if dropped > 0 {
            log::warn!("Execute discarded {dropped} task(s) queued after the drain");
        }

        let failures = std::mem::take(&mut *lock(&self.shared.failures));
        if failures.is_empty() {
            Ok(())
        } else {
            log::warn!("{} task(s) failed during execute", failures.len());
            Err(TaskError::TaskFailures(failures))
        }
    }

    /// Stop the workers and reject any further work.
    ///
    /// Waits for the workers to exit. Calling it again is a no-op.
    pub fn dispose(&self) {
        if self.disposed.swap(true, Ordering::AcqRel) {
            return;
        }

        lock(&self.shared.release).shutdown = true;
        self.shared.release_signal.notify_all();

        let current = thread::current().id();
        let handles = std::mem::take(&mut *lock(&self.workers));
        for handle in handles {
            if handle.thread().id() == current {
                continue;
            }
            if handle.join().is_err() {
                log::error!("Task worker exited abnormally");
            }
        }

        let dropped = lock(&self.shared.queue).len();
        if dropped > 0 {
            log::warn!("Task manager disposed with {dropped} task(s) still queued");
        }
        log::info!("Task manager disposed");
    }

    /// Whether `dispose` has been called
    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::Acquire)
    }
}

impl Drop for TaskManager {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl fmt::Debug for TaskManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskManager")
            .field("thread_count", &self.thread_count)
            .field("pending_tasks", &self.pending_tasks())
            .field("running", &self.running.load(Ordering::Relaxed))
            .field("disposed", &self.is_disposed())
            .finish()
    }
}

/// Clears the in-flight flag however `execute` returns
struct RunningGuard<'a>(&'a AtomicBool);

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
