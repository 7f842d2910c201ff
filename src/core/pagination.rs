/// Dogs per page, fixed for the session
pub const PAGE_SIZE: u32 = 15;

/// Current page and the last total reported by the service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageState {
    current: u32,
    total: u64,
}

impl Default for PageState {
    fn default() -> Self {
        Self { current: 1, total: 0 }
    }
}

impl PageState {
    /// 1-indexed page number
    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn size(&self) -> u32 {
        PAGE_SIZE
    }

    /// `ceil(total / PAGE_SIZE)`, never less than 1
    pub fn total_pages(&self) -> u32 {
        let pages = self.total.div_ceil(PAGE_SIZE as u64).max(1);
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    /// Record offset of the first dog on the current page
    pub fn offset(&self) -> u64 {
        u64::from(self.current - 1) * u64::from(PAGE_SIZE)
    }

    /// Move to page `n`. Out-of-range pages are kept; the service decides.
    /// Page 0 is clamped to 1.
    pub fn set_current(&mut self, n: u32) {
        self.current = n.max(1);
    }

    pub fn reset(&mut self) {
        self.current = 1;
    }

    pub fn set_total(&mut self, total: u64) {
        self.total = total;
    }

    pub fn has_prev(&self) -> bool {
        self.current > 1
    }

    pub fn has_next(&self) -> bool {
        self.current < self.total_pages()
    }
}
