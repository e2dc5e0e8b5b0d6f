// ABOUTME: Page window and chunk range arithmetic over stream sample indices
// ABOUTME: Guarantees chunk ranges cover [0, total) exactly once with no gaps or overlaps
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::ops::Range;

use serde::Serialize;

use crate::errors::{AppError, AppResult};

/// Number of pages needed for `total_points`; an empty dataset still has one (empty) page
#[must_use]
pub fn total_pages(total_points: usize, points_per_page: usize) -> usize {
    total_points.div_ceil(points_per_page.max(1)).max(1)
}

/// Number of chunks needed for `total_points`; an empty dataset has none
#[must_use]
pub fn chunk_count(total_points: usize, chunk_size: usize) -> usize {
    total_points.div_ceil(chunk_size.max(1))
}

/// One validated page of a single-page response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageWindow {
    /// 1-based page index
    pub page: usize,
    /// Requested page size
    pub points_per_page: usize,
    /// Points available across all pages
    pub total_points: usize,
    /// Number of pages
    pub total_pages: usize,
    /// First sample index (inclusive)
    pub start: usize,
    /// Last sample index (exclusive)
    pub end: usize,
}

impl PageWindow {
    /// Resolve a requested page against the dataset size
    ///
    /// # Errors
    ///
    /// Returns an `INVALID_PAGE` error naming the valid range when
    /// `page < 1` or `page > total_pages`.
    pub fn resolve(page: i64, points_per_page: usize, total_points: usize) -> AppResult<Self> {
        let per_page = points_per_page.max(1);
        let total_pages = total_pages(total_points, per_page);

        let index = usize::try_from(page)
            .ok()
            .filter(|&p| (1..=total_pages).contains(&p))
            .ok_or_else(|| AppError::invalid_page(page, total_pages, total_points))?;

        let start = ((index - 1) * per_page).min(total_points);
        let end = (index * per_page).min(total_points);

        Ok(Self {
            page: index,
            points_per_page: per_page,
            total_points,
            total_pages,
            start,
            end,
        })
    }

    /// Sample index range covered by this page
    #[must_use]
    pub const fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Whether a later page exists
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// Whether an earlier page exists
    #[must_use]
    pub const fn has_prev(&self) -> bool {
        self.page > 1
    }
}

/// One contiguous slice of a chunked response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChunkRange {
    /// 0-based chunk index
    pub index: usize,
    /// First sample index (inclusive)
    pub start: usize,
    /// Last sample index (exclusive)
    pub end: usize,
}

impl ChunkRange {
    /// 1-based position used in chunk headers
    #[must_use]
    pub const fn ordinal(&self) -> usize {
        self.index + 1
    }

    /// Number of samples in the chunk
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether the chunk is empty
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.end == self.start
    }

    /// Last sample index covered (inclusive)
    #[must_use]
    pub const fn last_point(&self) -> usize {
        self.end.saturating_sub(1)
    }

    /// Sample index range covered by this chunk
    #[must_use]
    pub const fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Self-identifying header, e.g. `Chunk 2/3 (points 1920-3839)`
    #[must_use]
    pub fn header(&self, total_chunks: usize) -> String {
        format!(
            "Chunk {}/{total_chunks} (points {}-{})",
            self.ordinal(),
            self.start,
            self.last_point()
        )
    }
}

/// Split `[0, total_points)` into consecutive ranges of at most `chunk_size`
#[must_use]
pub fn chunk_ranges(total_points: usize, chunk_size: usize) -> Vec<ChunkRange> {
    let size = chunk_size.max(1);
    (0..chunk_count(total_points, size))
        .map(|index| {
            let start = index * size;
            ChunkRange {
                index,
                start,
                end: (start + size).min(total_points),
            }
        })
        .collect()
}
