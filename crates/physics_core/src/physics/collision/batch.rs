//! Parallel narrow phase over many candidate pairs

use std::sync::{Arc, Mutex, PoisonError};

use crate::foundation::math::Vec3;
use crate::tasks::{TaskError, TaskManager};
use super::contact::ContactList;
use super::narrow_phase;
use super::part::Part;

/// One candidate pair handed over by the broad phase
#[derive(Debug, Clone)]
pub struct PairTest {
    /// First part
    pub a: Arc<Part>,
    /// Second part
    pub b: Arc<Part>,
    /// Motion of `a` relative to `b`; `None` runs the static overlap test
    pub delta: Option<Vec3>,
}

impl PairTest {
    /// Static overlap test between two parts
    pub fn overlap(a: Arc<Part>, b: Arc<Part>) -> Self {
        Self { a, b, delta: None }
    }

    /// Swept test between two parts
    pub fn swept(a: Arc<Part>, b: Arc<Part>, delta: Vec3) -> Self {
        Self { a, b, delta: Some(delta) }
    }
}

/// Run every pair test on the task manager's workers.
///
/// Each pair writes into its own contact list, returned in input order. A pair
/// with no algorithm is reported as a task failure once the whole batch has
/// run; every other pair still produces its contacts in that case, but they
/// are not returned.
pub fn collide_pairs(manager: &TaskManager, pairs: Vec<PairTest>) -> Result<Vec<ContactList>, TaskError> {
    let slots: Arc<Vec<Mutex<ContactList>>> =
        Arc::new((0..pairs.len()).map(|_| Mutex::new(ContactList::new())).collect());

    for (index, pair) in pairs.into_iter().enumerate() {
        let slots = Arc::clone(&slots);
        let label = format!("pair {index}: {} vs {}", pair.a.kind(), pair.b.kind());
        manager.add_fallible_task(label, move || {
            let mut contacts = slots[index].lock().unwrap_or_else(PoisonError::into_inner);
            match pair.delta {
                Some(delta) => narrow_phase::swept_test(&mut *contacts, &pair.a, &pair.b, delta),
                None => narrow_phase::overlap_test(&mut *contacts, &pair.a, &pair.b),
            }
        })?;
    }

    manager.execute()?;

    let results = slots
        .iter()
        .map(|slot| std::mem::take(&mut *slot.lock().unwrap_or_else(PoisonError::into_inner)))
        .collect::<Vec<_>>();
    log::trace!("Narrow phase batch produced {} contact lists", results.len());
    Ok(results)
}
