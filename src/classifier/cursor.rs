// Resumable progress through a match session
//
// A session compares each model group against data group 0, one group per
// scheduler tick. The cursor is the only state carried between ticks.

/// Upper limit on model groups matched in one session
pub const MAX_MATCH_GROUPS: usize = 3;

/// Position of a match session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchCursor {
    next: usize,
    total: usize,
}

impl MatchCursor {
    /// Cursor over `min(groups, MAX_MATCH_GROUPS)` model groups
    pub fn new(groups: usize) -> Self {
        MatchCursor {
            next: 0,
            total: groups.min(MAX_MATCH_GROUPS),
        }
    }

    /// Hand out the next group index, or `None` (and rewind) once exhausted
    pub fn advance(&mut self) -> Option<usize> {
        if self.next >= self.total {
            self.reset();
            return None;
        }
        let group = self.next;
        self.next += 1;
        Some(group)
    }

    /// Rewind to the first group
    pub fn reset(&mut self) {
        self.next = 0;
    }

    /// `(groups handed out, groups in session)`
    pub fn progress(&self) -> (usize, usize) {
        (self.next, self.total)
    }

    pub fn is_exhausted(&self) -> bool {
        self.next >= self.total
    }
}
