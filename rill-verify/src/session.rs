#![forbid(unsafe_code)]

/// Per-translation state: mints the auxiliary index variables used when
/// quantifying over list-like loop sources.
///
/// Owned by the driver and threaded through explicitly, so unrelated
/// translation runs can never collide on names.
#[derive(Debug, Default)]
pub struct VcSession {
    next_index: u32,
}

impl VcSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fresh_index_var(&mut self) -> String {
        let n = self.next_index;
        self.next_index += 1;
        format!("i{n}")
    }
}
