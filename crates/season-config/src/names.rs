//! Name pool for generated players.

use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;

const FIRST: [&str; 24] = [
    "Alys", "Angus", "Bryn", "Cadoc", "Ceridwen", "Dervla", "Eamon", "Elspeth", "Fergus", "Gwen",
    "Hamish", "Isolde", "Jory", "Kenna", "Lachlan", "Maeve", "Niall", "Orla", "Perrin", "Rhona",
    "Seren", "Tamsin", "Ulric", "Wynn",
];

const LAST: [&str; 24] = [
    "Abernethy", "Blackthorn", "Caddock", "Dunmore", "Eldritch", "Fairweather", "Gorse",
    "Hollins", "Ironside", "Jessop", "Kettleburn", "Lockhart", "Mallory", "Nettles", "Oakes",
    "Pennifold", "Quill", "Rookwood", "Stormcrow", "Thistlewood", "Underhill", "Vance", "Winslow",
    "Yarrow",
];

/// Draws names that are unique within one team.
pub struct NamePool {
    used: HashSet<String>,
}

impl NamePool {
    /// A pool that will not hand out any of `taken`.
    pub fn new<'a>(taken: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            used: taken.into_iter().map(str::to_string).collect(),
        }
    }

    pub fn draw<R: Rng>(&mut self, rng: &mut R) -> String {
        for _ in 0..32 {
            let (Some(first), Some(last)) = (FIRST.choose(rng), LAST.choose(rng)) else {
                break;
            };
            let name = format!("{first} {last}");
            if self.used.insert(name.clone()) {
                return name;
            }
        }
        let name = format!("Reserve {}", self.used.len() + 1);
        self.used.insert(name.clone());
        name
    }
}
