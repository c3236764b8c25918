//! Breadth-first reachability over a parsed [`Module`].

use std::collections::{HashSet, VecDeque};

use thiserror::Error;
use tracing::debug;

use crate::model::{FnDef, Module, Step};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClosureError {
    #[error("start function not found: {0:?}")]
    StartNotFound(String),
}

/// FIFO worklist that admits each function name at most once.
#[derive(Debug, Default)]
struct Worklist<'m> {
    queue: VecDeque<&'m FnDef>,
    seen: HashSet<&'m str>,
}

impl<'m> Worklist<'m> {
    fn push(&mut self, def: &'m FnDef) {
        if self.seen.insert(def.name.as_str()) {
            self.queue.push_back(def);
        }
    }

    fn pop(&mut self) -> Option<&'m FnDef> {
        self.queue.pop_front()
    }
}

/// Walk every function reachable from `start` through call and tail-call
/// steps.
///
/// `visit` is called once per reachable function, starting with `start`;
/// returning `false` stops the whole walk, not just the current branch.
/// `ignore_edge` is asked about each step whose target is a defined function;
/// returning `true` leaves that edge unexplored.
pub fn closure<'m, V, F>(
    module: &'m Module,
    start: &str,
    mut visit: V,
    mut ignore_edge: F,
) -> Result<(), ClosureError>
where
    V: FnMut(&'m FnDef) -> bool,
    F: FnMut(&'m FnDef, &'m Step) -> bool,
{
    let root = module.get(start).ok_or_else(|| ClosureError::StartNotFound(start.to_string()))?;

    let mut work = Worklist::default();
    work.push(root);

    let mut visited = 0usize;
    while let Some(def) = work.pop() {
        visited += 1;
        if !visit(def) {
            debug!(start, visited, "closure stopped by visitor");
            return Ok(());
        }
        for step in &def.steps {
            let Some(target) = step.edge_target().and_then(|name| module.get(name)) else {
                continue;
            };
            if ignore_edge(def, step) {
                continue;
            }
            work.push(target);
        }
    }
    debug!(start, visited, "closure complete");
    Ok(())
}

/// Names of every function reachable from `start`, in visit order.
pub fn reachable<'m, F>(
    module: &'m Module,
    start: &str,
    ignore_edge: F,
) -> Result<Vec<String>, ClosureError>
where
    F: FnMut(&'m FnDef, &'m Step) -> bool,
{
    let mut names = Vec::new();
    closure(
        module,
        start,
        |def| {
            names.push(def.name.clone());
            true
        },
        ignore_edge,
    )?;
    Ok(names)
}
