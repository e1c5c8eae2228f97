use std::collections::VecDeque;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::JoinHandle;

use crossbeam_channel::{unbounded, Receiver, Sender};

use crate::*;

enum PendingTask {
  Request(Box<dyn PageRequest>),
  Stop,
}

/// Drives page nodes: hands load requests to a worker thread, attaches the
/// results on `update`, and expires pages that have not been used for a
/// while. Without a started worker everything loads synchronously, which
/// keeps single threaded callers and tests simple.
pub struct Pager {
  pending: Sender<PendingTask>,
  pending_rx: Receiver<PendingTask>,
  finished: Sender<Box<dyn PageRequest>>,
  finished_rx: Receiver<Box<dyn PageRequest>>,
  worker: Option<JoinHandle<()>>,
  /// Least recently used page node at the front.
  pages: VecDeque<NodeRef>,
  use_stamp: u64,
}

impl Default for Pager {
  fn default() -> Self {
    Self::new()
  }
}

impl Pager {
  pub fn new() -> Self {
    let (pending, pending_rx) = unbounded();
    let (finished, finished_rx) = unbounded();
    Self {
      pending,
      pending_rx,
      finished,
      finished_rx,
      worker: None,
      pages: VecDeque::new(),
      use_stamp: 0,
    }
  }

  pub fn start(&mut self) {
    if self.worker.is_some() {
      return;
    }
    let pending = self.pending_rx.clone();
    let finished = self.finished.clone();
    self.worker = Some(std::thread::spawn(move || run(pending, finished)));
    log::debug!("pager worker started");
  }

  /// Stops the worker after it finished everything already queued. Loaded
  /// requests still wait for the next `update` to be attached.
  pub fn stop(&mut self) {
    let Some(worker) = self.worker.take() else {
      return;
    };
    let _ = self.pending.send(PendingTask::Stop);
    let _ = worker.join();
    log::debug!("pager worker stopped");
  }

  /// Reports a page node as used this frame. Kicks off a load when the node
  /// has none pending and refreshes its position in the expiry order.
  pub fn use_page(&mut self, node: &NodeRef) {
    let Some(page) = node.as_page() else {
      return;
    };
    page.touch(self.use_stamp);
    if page.is_requested() {
      if let Some(at) = self.pages.iter().position(|p| Arc::ptr_eq(p, node)) {
        self.pages.remove(at);
      }
      self.pages.push_back(node.clone());
      return;
    }
    let Some(request) = page.begin_request(node) else {
      return;
    };
    self.pages.push_back(node.clone());
    log::trace!("page load requested at stamp {}", self.use_stamp);
    if self.worker.is_some() {
      let _ = self.pending.send(PendingTask::Request(request));
    } else if let Some(mut request) = execute(request) {
      request.insert();
    }
  }

  /// Advances the frame stamp by one, attaches every finished load and
  /// unloads pages whose stamp age reached `expiry`. `update` owns the
  /// per-cycle advancement; callers never tick the clock themselves.
  pub fn update(&mut self, expiry: u64) {
    self.use_stamp = self.use_stamp.wrapping_add(1);
    for mut request in self.finished_rx.try_iter() {
      request.insert();
      log::trace!("loaded page inserted at stamp {}", self.use_stamp);
    }
    while let Some(node) = self.pages.front().cloned() {
      let Some(page) = node.as_page() else {
        self.pages.pop_front();
        continue;
      };
      if self.use_stamp.wrapping_sub(page.use_stamp()) < expiry {
        break;
      }
      page.unload(Arc::as_ptr(&node));
      self.pages.pop_front();
      log::trace!("expired page unloaded at stamp {}", self.use_stamp);
    }
  }

  pub fn use_stamp(&self) -> u64 {
    self.use_stamp
  }

  /// Absolute reset of the logical clock, e.g. when restoring a session.
  /// Not a per-cycle tick, [`update`] already advances the stamp.
  ///
  /// [`update`]: Pager::update
  pub fn set_use_stamp(&mut self, stamp: u64) {
    self.use_stamp = stamp;
  }

  pub fn num_tracked_pages(&self) -> usize {
    self.pages.len()
  }
}

impl Drop for Pager {
  fn drop(&mut self) {
    self.stop();
  }
}

/// Runs the load shielded against panics. A panicking loader loses its
/// request, the page stays claimed and is never retried.
fn execute(mut request: Box<dyn PageRequest>) -> Option<Box<dyn PageRequest>> {
  match catch_unwind(AssertUnwindSafe(|| request.load())) {
    Ok(()) => Some(request),
    Err(_) => {
      log::error!("page load panicked, request dropped");
      None
    }
  }
}

fn run(pending: Receiver<PendingTask>, finished: Sender<Box<dyn PageRequest>>) {
  while let Ok(task) = pending.recv() {
    let request = match task {
      PendingTask::Request(request) => request,
      PendingTask::Stop => return,
    };
    if let Some(request) = execute(request) {
      if finished.send(request).is_err() {
        return;
      }
    }
  }
}
