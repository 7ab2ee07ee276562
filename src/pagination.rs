//! Windowed page navigation for a result set.

use std::fmt::{Display, Formatter};

/// Pages always shown at the start and end of the window.
const EDGE: usize = 2;
/// Pages shown before the current one.
const BEFORE: usize = 2;
/// Pages shown after the current one.
const AFTER: usize = 4;

/// One entry of the navigation strip. Indices are zero-based.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageLink {
    Page(usize),
    Gap,
}

/// The navigation strip for `current` out of `total` pages, e.g.
/// `1 2 … 5 6 [7] 8 9 10 11 … 19 20`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageWindow {
    pub links: Vec<PageLink>,
    pub current: usize,
}

impl PageWindow {
    pub fn new(current: usize, total: usize) -> Self {
        Self {
            links: page_links(current, total),
            current,
        }
    }
}

fn page_links(current: usize, total: usize) -> Vec<PageLink> {
    if total == 0 {
        return Vec::new();
    }
    let current = current.min(total - 1);

    let mut links = Vec::new();

    let head_end = EDGE.min(total);
    links.extend((0..head_end).map(PageLink::Page));

    let mid_start = head_end.max(current.saturating_sub(BEFORE));
    let mid_end = current.saturating_add(AFTER + 1).min(total);
    if mid_start > head_end {
        links.push(PageLink::Gap);
    }
    links.extend((mid_start..mid_end).map(PageLink::Page));

    let tail_start = mid_end.max(total.saturating_sub(EDGE));
    if tail_start > mid_end {
        links.push(PageLink::Gap);
    }
    links.extend((tail_start..total).map(PageLink::Page));

    links
}

impl Display for PageWindow {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (i, link) in self.links.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            match link {
                PageLink::Page(page) if *page == self.current => write!(f, "[{}]", page + 1)?,
                PageLink::Page(page) => write!(f, "{}", page + 1)?,
                PageLink::Gap => f.write_str("…")?,
            }
        }
        Ok(())
    }
}
