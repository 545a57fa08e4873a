//! Offset pagination for listing pages.

pub const DEFAULT_PER_PAGE: u32 = 5;

/// A 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub per_page: u32,
}

impl PageRequest {
    pub fn new(page: u32, per_page: u32) -> Self {
        Self {
            page,
            per_page: per_page.max(1),
        }
    }

    /// Number of rows to skip. Page 0 is treated like page 1.
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.per_page)
    }

    pub fn limit(&self) -> u64 {
        u64::from(self.per_page)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(1, DEFAULT_PER_PAGE)
    }
}

/// One entry of the page navigation bar. `number == None` marks a gap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLink {
    pub number: Option<u32>,
    pub current: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub per_page: u32,
    pub total: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, request: PageRequest, total: u64) -> Self {
        Self {
            items,
            page: request.page,
            per_page: request.per_page,
            total,
        }
    }

    /// Slice an in-memory, already ordered collection.
    pub fn from_ordered(all: Vec<T>, request: PageRequest) -> Self {
        let total = all.len() as u64;
        let items = all
            .into_iter()
            .skip(request.offset() as usize)
            .take(request.per_page as usize)
            .collect();
        Self::new(items, request, total)
    }

    pub fn pages(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        self.total.div_ceil(u64::from(self.per_page)) as u32
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.pages()
    }

    pub fn prev_num(&self) -> Option<u32> {
        self.has_prev().then(|| self.page - 1)
    }

    pub fn next_num(&self) -> Option<u32> {
        self.has_next().then(|| self.page + 1)
    }

    /// A requested page that cannot exist: page 0, or an empty page past the first.
    pub fn is_out_of_range(&self) -> bool {
        self.page < 1 || (self.items.is_empty() && self.page != 1)
    }

    /// Page numbers to show in a navigation bar, `None` where numbers are skipped.
    pub fn iter_pages(
        &self,
        left_edge: u32,
        left_current: u32,
        right_current: u32,
        right_edge: u32,
    ) -> Vec<Option<u32>> {
        let pages = self.pages();
        let mut out = Vec::new();
        let mut last = 0;
        for num in 1..=pages {
            let in_left_edge = num <= left_edge;
            let near_current = i64::from(num) > i64::from(self.page) - i64::from(left_current) - 1
                && num < self.page + right_current;
            let in_right_edge = num > pages.saturating_sub(right_edge);
            if in_left_edge || near_current || in_right_edge {
                if last + 1 != num {
                    out.push(None);
                }
                out.push(Some(num));
                last = num;
            }
        }
        out
    }

    /// Navigation links with the window used by the listing templates.
    pub fn links(&self) -> Vec<PageLink> {
        self.iter_pages(1, 1, 2, 1)
            .into_iter()
            .map(|number| PageLink {
                number,
                current: number == Some(self.page),
            })
            .collect()
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            per_page: self.per_page,
            total: self.total,
        }
    }
}
