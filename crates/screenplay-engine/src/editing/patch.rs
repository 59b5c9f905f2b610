use std::ops::Range;

/// Result of applying a command.
///
/// Every edit is a splice: `replaced` blocks starting at `changed.start` in the
/// previous version were replaced by the blocks now at `changed`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patch {
    pub changed: Range<usize>,
    pub replaced: usize,
    pub version: u64,
}

impl Patch {
    /// Net change in block count.
    pub fn len_delta(&self) -> isize {
        self.changed.len() as isize - self.replaced as isize
    }

    /// Whether the patch changed nothing but the version.
    pub fn is_empty(&self) -> bool {
        self.changed.is_empty() && self.replaced == 0
    }

    /// Single patch equivalent to applying `self` then `next`.
    ///
    /// The result covers every block either patch touched, expressed as one
    /// splice from the version before `self` to `next.version`.
    pub fn compose(&self, next: &Patch) -> Patch {
        if self.is_empty() {
            return Patch {
                version: next.version,
                ..next.clone()
            };
        }
        if next.is_empty() {
            return Patch {
                version: next.version,
                ..self.clone()
            };
        }

        let next_old_end = next.changed.start + next.replaced;
        let shift = |x: usize| -> usize {
            if x >= next_old_end {
                x + next.changed.len() - next.replaced
            } else if x > next.changed.start {
                next.changed.end
            } else {
                x
            }
        };

        let start = self.changed.start.min(next.changed.start);
        let end = shift(self.changed.end).max(next.changed.end);
        let delta = self.len_delta() + next.len_delta();
        let replaced = ((end - start) as isize - delta).max(0) as usize;

        Patch {
            changed: start..end,
            replaced,
            version: next.version,
        }
    }
}
