//! Windowing math for virtualized rows and columns.
//!
//! The same [`Virtualizer`] serves both axes: rows keyed by row height,
//! columns keyed by cumulative column width. It computes which items
//! intersect the viewport (plus an overscan margin) and how much space the
//! spacers before and after the rendered items must reserve so the
//! scrollbar reflects the full content size.

use std::ops::Range;

/// Sizes of the items along one axis, in pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemSizes {
    /// `count` items of the same size.
    Fixed { size: u32, count: usize },
    /// One size per item.
    Variable(Vec<u32>),
}

/// The items to render for one scroll position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VirtualWindow {
    /// First rendered index.
    pub start: usize,
    /// One past the last rendered index.
    pub end: usize,
    /// First index intersecting the viewport.
    pub first_visible: usize,
    /// Last index intersecting the viewport.
    pub last_visible: usize,
    /// Spacer size before the rendered items.
    pub offset_before: u64,
    /// Spacer size after the rendered items.
    pub offset_after: u64,
    /// Size of the whole content.
    pub total_size: u64,
    /// Scroll offset after clamping to the content.
    pub scroll_offset: u64,
    /// `false` when everything is rendered without windowing.
    pub windowed: bool,
}

impl VirtualWindow {
    /// Rendered index range.
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Number of rendered items.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Offset ↔ index lookups over item sizes.
#[derive(Debug, Clone)]
pub struct Virtualizer {
    sizes: Sizes,
    overscan: usize,
    threshold: usize,
}

#[derive(Debug, Clone)]
enum Sizes {
    Fixed { size: u32, count: usize },
    /// Prefix sums: `offsets[i]` is where item `i` starts, the last entry
    /// is the total size.
    Prefix(Vec<u64>),
}

impl Virtualizer {
    /// Create a virtualizer with the given overscan (items rendered beyond
    /// each edge of the viewport).
    pub fn new(sizes: ItemSizes, overscan: usize) -> Self {
        let sizes = match sizes {
            ItemSizes::Fixed { size, count } => Sizes::Fixed { size, count },
            ItemSizes::Variable(sizes) => {
                let mut offsets = Vec::with_capacity(sizes.len() + 1);
                let mut offset = 0u64;
                offsets.push(0);
                for size in sizes {
                    offset += size as u64;
                    offsets.push(offset);
                }
                Sizes::Prefix(offsets)
            }
        };
        Self {
            sizes,
            overscan,
            threshold: 0,
        }
    }

    /// Render everything without windowing when there are at most
    /// `threshold` items.
    pub fn with_threshold(mut self, threshold: usize) -> Self {
        self.threshold = threshold;
        self
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        match &self.sizes {
            Sizes::Fixed { count, .. } => *count,
            Sizes::Prefix(offsets) => offsets.len() - 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Size of the whole content.
    pub fn total_size(&self) -> u64 {
        match &self.sizes {
            Sizes::Fixed { size, count } => *size as u64 * *count as u64,
            Sizes::Prefix(offsets) => offsets.last().copied().unwrap_or(0),
        }
    }

    /// Offset where item `index` starts. `index == len()` gives the total
    /// size.
    pub fn offset_of(&self, index: usize) -> u64 {
        let index = index.min(self.len());
        match &self.sizes {
            Sizes::Fixed { size, .. } => *size as u64 * index as u64,
            Sizes::Prefix(offsets) => offsets[index],
        }
    }

    /// Size of item `index`.
    pub fn size_of(&self, index: usize) -> u64 {
        self.offset_of(index + 1) - self.offset_of(index)
    }

    /// Index of the item containing `offset`, clamped to the last item.
    ///
    /// Must not be called on an empty virtualizer.
    fn index_at(&self, offset: u64) -> usize {
        let last = self.len() - 1;
        match &self.sizes {
            Sizes::Fixed { size: 0, .. } => 0,
            Sizes::Fixed { size, .. } => ((offset / *size as u64) as usize).min(last),
            Sizes::Prefix(offsets) => offsets
                .partition_point(|&start| start <= offset)
                .saturating_sub(1)
                .min(last),
        }
    }

    /// Largest valid scroll offset for a viewport.
    pub fn max_scroll_offset(&self, viewport: u64) -> u64 {
        self.total_size().saturating_sub(viewport)
    }

    /// Compute the rendered window.
    ///
    /// The scroll offset is clamped first, so a list that shrank under a
    /// stale offset shows its end instead of empty space.
    pub fn window(&self, viewport: u64, scroll_offset: u64) -> VirtualWindow {
        let count = self.len();
        let total_size = self.total_size();
        if count == 0 {
            return VirtualWindow::default();
        }

        let scroll_offset = scroll_offset.min(self.max_scroll_offset(viewport));
        let first_visible = self.index_at(scroll_offset);
        let last_visible = self.index_at(scroll_offset + viewport.max(1) - 1);

        if count <= self.threshold || total_size <= viewport {
            return VirtualWindow {
                start: 0,
                end: count,
                first_visible,
                last_visible,
                offset_before: 0,
                offset_after: 0,
                total_size,
                scroll_offset,
                windowed: false,
            };
        }

        let start = first_visible.saturating_sub(self.overscan);
        let end = (last_visible + self.overscan + 1).min(count);
        VirtualWindow {
            start,
            end,
            first_visible,
            last_visible,
            offset_before: self.offset_of(start),
            offset_after: total_size - self.offset_of(end),
            total_size,
            scroll_offset,
            windowed: true,
        }
    }

    /// Scroll offset that brings `index` fully into view, moving as little
    /// as possible from `current`.
    pub fn scroll_into_view(&self, index: usize, viewport: u64, current: u64) -> u64 {
        if index >= self.len() {
            return current.min(self.max_scroll_offset(viewport));
        }
        let top = self.offset_of(index);
        let bottom = self.offset_of(index + 1);
        let offset = if top < current {
            top
        } else if bottom > current + viewport {
            bottom.saturating_sub(viewport)
        } else {
            current
        };
        offset.min(self.max_scroll_offset(viewport))
    }
}
