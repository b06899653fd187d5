//! Bounded render worker pool.
//!
//! Workers pull task indices from a shared cursor. The first failure flips
//! the abort flag so no new task starts; in-flight tasks finish and the
//! failure is reported once the pool has drained.

use std::{
    fs, io,
    path::{Path, PathBuf},
    sync::atomic::{AtomicBool, AtomicUsize, Ordering},
    thread,
};

use crossbeam::channel;
use parking_lot::Mutex;
use thiserror::Error;

use super::plan::RenderTask;
use crate::{
    core, debug,
    logger::ProgressLine,
    render::{Compositor, RenderError, RenderPayload, render_png},
};

#[derive(Debug, Error)]
pub enum TaskError {
    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("failed to write `{0}`")]
    Write(PathBuf, #[source] io::Error),
}

#[derive(Debug, Error)]
pub enum PoolError {
    #[error("render failed for `{route_key}`")]
    Task {
        route_key: String,
        #[source]
        source: TaskError,
    },

    #[error("interrupted after {done} of {total} renders")]
    Interrupted { done: usize, total: usize },
}

/// Render every task with `workers` threads. Returns the number written.
pub fn run(
    tasks: &[RenderTask],
    workers: usize,
    compositor: &dyn Compositor,
    out_dir: &Path,
) -> Result<usize, PoolError> {
    if tasks.is_empty() {
        return Ok(0);
    }

    let cursor = AtomicUsize::new(0);
    let abort = AtomicBool::new(false);
    let first_error: Mutex<Option<PoolError>> = Mutex::new(None);
    let progress = ProgressLine::new(&[("render", tasks.len())]);
    let (tx, rx) = channel::unbounded::<usize>();

    let wrote = thread::scope(|scope| {
        for _ in 0..workers.min(tasks.len()) {
            let tx = tx.clone();
            let (cursor, abort, first_error) = (&cursor, &abort, &first_error);
            scope.spawn(move || {
                loop {
                    if abort.load(Ordering::Relaxed) || core::is_shutdown() {
                        break;
                    }
                    let index = cursor.fetch_add(1, Ordering::Relaxed);
                    let Some(task) = tasks.get(index) else { break };

                    match render_task(task, compositor, out_dir) {
                        Ok(()) => {
                            let _ = tx.send(index);
                        }
                        Err(source) => {
                            abort.store(true, Ordering::SeqCst);
                            let mut slot = first_error.lock();
                            if slot.is_none() {
                                *slot = Some(PoolError::Task {
                                    route_key: task.route_key.clone(),
                                    source,
                                });
                            }
                            break;
                        }
                    }
                }
            });
        }
        drop(tx);

        let mut wrote = 0;
        for index in rx {
            wrote += 1;
            progress.inc("render");
            debug!("render"; "{}", tasks[index].file_name);
        }
        wrote
    });

    if let Some(err) = first_error.into_inner() {
        drop(progress);
        return Err(err);
    }
    if wrote < tasks.len() {
        drop(progress);
        return Err(PoolError::Interrupted {
            done: wrote,
            total: tasks.len(),
        });
    }
    progress.finish();
    Ok(wrote)
}

/// One render plus one file write. The file appears under its final name
/// only once complete, so a partial write never looks like a cache hit.
fn render_task(task: &RenderTask, compositor: &dyn Compositor, out_dir: &Path) -> Result<(), TaskError> {
    let payload = RenderPayload::from_query(&task.query);
    let png = render_png(compositor, &payload)?;

    let path = out_dir.join(&task.file_name);
    let tmp = out_dir.join(format!(".{}.tmp", task.file_name));
    fs::write(&tmp, png).map_err(|e| TaskError::Write(tmp.clone(), e))?;
    fs::rename(&tmp, &path).map_err(|e| TaskError::Write(path, e))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use std::sync::atomic::AtomicUsize;
    use tempfile::TempDir;

    /// Paints a 2×2 image; fails for any title in `fail_on`.
    pub(crate) struct FakeCompositor {
        pub fail_on: Option<&'static str>,
        pub calls: AtomicUsize,
    }

    impl FakeCompositor {
        pub(crate) fn new() -> Self {
            Self { fail_on: None, calls: AtomicUsize::new(0) }
        }
    }

    impl Compositor for FakeCompositor {
        fn render(&self, payload: &RenderPayload) -> Result<RgbaImage, RenderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_on == Some(payload.title.as_str()) {
                return Err(RenderError::Pixmap(0, 0));
            }
            let shade = (payload.title.len() % 256) as u8;
            Ok(RgbaImage::from_pixel(2, 2, Rgba([shade, 0, 0, 255])))
        }
    }

    fn task(key: &str) -> RenderTask {
        RenderTask {
            route_key: key.into(),
            file_name: format!("{key}-0000000000000000.png"),
            query: RenderPayload { title: key.into(), ..Default::default() }.to_query(),
        }
    }

    #[test]
    fn test_renders_all_tasks() {
        let dir = TempDir::new().unwrap();
        let tasks: Vec<_> = (0..10).map(|i| task(&format!("page-{i}"))).collect();
        let compositor = FakeCompositor::new();

        let wrote = run(&tasks, 3, &compositor, dir.path()).unwrap();
        assert_eq!(wrote, 10);
        for t in &tasks {
            assert!(dir.path().join(&t.file_name).is_file());
        }
        let leftovers = fs::read_dir(dir.path())
            .unwrap()
            .filter(|e| e.as_ref().unwrap().file_name().to_string_lossy().ends_with(".tmp"))
            .count();
        assert_eq!(leftovers, 0);
    }

    #[test]
    fn test_first_failure_stops_scheduling() {
        let dir = TempDir::new().unwrap();
        let tasks: Vec<_> = (0..50).map(|i| task(&format!("page-{i}"))).collect();
        let compositor = FakeCompositor { fail_on: Some("page-0"), ..FakeCompositor::new() };

        let err = run(&tasks, 1, &compositor, dir.path()).unwrap_err();
        match err {
            PoolError::Task { route_key, .. } => assert_eq!(route_key, "page-0"),
            other => panic!("unexpected {other}"),
        }
        assert_eq!(compositor.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_empty_task_list() {
        let dir = TempDir::new().unwrap();
        assert_eq!(run(&[], 4, &FakeCompositor::new(), dir.path()).unwrap(), 0);
    }
}
