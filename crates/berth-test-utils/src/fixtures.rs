//! Reusable queue payload fixtures.
//!
//! - [`Person`]: the record used by the roster scenarios.
//! - [`CloneBomb`]: panics on clone once its shared budget runs out.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

/// A small record with an owned string, rendered as
/// `Person #<id> <name> (tasks: <n>)`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Person {
    pub identifier: i32,
    pub name: String,
    pub task_count: i32,
}

impl Person {
    pub fn new(identifier: i32, name: impl Into<String>, task_count: i32) -> Self {
        Self {
            identifier,
            name: name.into(),
            task_count,
        }
    }
}

impl fmt::Display for Person {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Person #{} {} (tasks: {})",
            self.identifier, self.name, self.task_count
        )
    }
}

/// Smith, Johnson and Williams, in that order.
pub fn roster() -> Vec<Person> {
    vec![
        Person::new(1, "Smith", 5),
        Person::new(2, "Johnson", 3),
        Person::new(3, "Williams", 7),
    ]
}

/// A value whose `clone` panics once a shared budget is spent.
///
/// All clones share one counter, so `CloneBomb::new(id, 2)` survives two
/// clones in total and panics on the third.
#[derive(Debug)]
pub struct CloneBomb {
    pub id: u32,
    clones_left: Rc<Cell<usize>>,
}

impl CloneBomb {
    pub fn new(id: u32, clones_allowed: usize) -> Self {
        Self {
            id,
            clones_left: Rc::new(Cell::new(clones_allowed)),
        }
    }
}

impl Clone for CloneBomb {
    fn clone(&self) -> Self {
        let left = self.clones_left.get();
        if left == 0 {
            panic!("CloneBomb {} exhausted its clone budget", self.id);
        }
        self.clones_left.set(left - 1);
        Self {
            id: self.id,
            clones_left: Rc::clone(&self.clones_left),
        }
    }
}
