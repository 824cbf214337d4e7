//! This module defines the common functionality for paging data.

use serde::{Deserialize, Serialize};

use crate::{
    Error,
    owner::OwnerId,
    period::{MonthPeriod, PeriodQuery},
};

/// The config for pagination
#[derive(Debug, Clone)]
pub struct PaginationConfig {
    /// The page number to default to when not specified in a request.
    pub default_page: u64,
    /// The number of records per page when not specified in a request.
    pub default_page_size: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page: 1,
            default_page_size: 10,
        }
    }
}

/// The query string accepted by listing endpoints, before validation.
#[derive(Debug, Default, Deserialize)]
pub struct PageQueryParams {
    /// The month (1-12) to list entries for.
    pub month: Option<u8>,
    /// The year (1-9999) to list entries for.
    pub year: Option<i32>,
    /// The 1-based page number, defaults to [PaginationConfig::default_page].
    pub page: Option<u64>,
    /// The page size, defaults to [PaginationConfig::default_page_size].
    pub page_size: Option<u64>,
}

impl PageQueryParams {
    /// Validate the month and year and fill in the page defaults.
    ///
    /// A page or page size of zero is treated the same as a missing one.
    ///
    /// # Errors
    /// Returns [Error::InvalidMonth] or [Error::InvalidYear] if the month or
    /// year is missing or out of range, or [Error::InvalidPage] if the page
    /// would start past the largest offset a store can be asked for.
    pub fn into_filter(self, owner: OwnerId, config: &PaginationConfig) -> Result<PageFilter, Error> {
        let month = self.month.unwrap_or(0);
        let year = self.year.unwrap_or(0);
        let period = MonthPeriod::new(month, year)?;

        let page = match self.page {
            None | Some(0) => config.default_page,
            Some(page) => page,
        };
        let page_size = match self.page_size {
            None | Some(0) => config.default_page_size,
            Some(page_size) => page_size,
        };

        let offset_fits = (page - 1)
            .checked_mul(page_size)
            .is_some_and(|offset| i64::try_from(offset).is_ok());
        if !offset_fits {
            return Err(Error::InvalidPage(page, page_size));
        }

        Ok(PageFilter {
            period,
            owner,
            page,
            page_size,
        })
    }
}

/// A validated request for one page of entries.
///
/// `page` and `page_size` must both be at least 1 and the page offset must fit in an `i64`.
#[derive(Debug, Clone, PartialEq)]
pub struct PageFilter {
    /// Only entries scheduled in this month.
    pub period: MonthPeriod,
    /// Only entries belonging to this owner.
    pub owner: OwnerId,
    /// The 1-based page number.
    pub page: u64,
    /// The maximum number of entries per page.
    pub page_size: u64,
}

/// One page of entries and where it sits in the whole collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    /// The page number that was requested.
    pub current_page: u64,
    /// The number of pages needed to show every matching entry.
    pub total_pages: u64,
    /// The number of matching entries across all pages.
    pub total_records: u64,
    /// The page size that was requested.
    pub page_limit: u64,
    /// The entries on this page.
    pub records: Vec<T>,
}

/// The number of entries before `page`.
///
/// `page` and `page_size` must be at least 1.
pub fn offset(page: u64, page_size: u64) -> u64 {
    (page - 1) * page_size
}

/// The number of pages of `page_size` entries needed to hold `total_records`.
///
/// `page_size` must be at least 1.
pub fn total_pages(total_records: u64, page_size: u64) -> u64 {
    let mut pages = total_records / page_size;

    if total_records % page_size > 0 {
        pages += 1;
    }

    pages
}

/// Read one page of entries.
///
/// Counts the entries matching `filter` with `count`, fetches the requested
/// slice with `fetch` and converts each entry with `map`. Any error from
/// `count` or `fetch` is returned as is and no partial page is produced.
pub fn read_page<T, R>(
    filter: &PageFilter,
    count: impl FnOnce(MonthPeriod, &OwnerId) -> Result<u64, Error>,
    fetch: impl FnOnce(&PeriodQuery) -> Result<Vec<T>, Error>,
    map: impl FnMut(T) -> R,
) -> Result<Page<R>, Error> {
    let offset = offset(filter.page, filter.page_size);
    let total_records = count(filter.period, &filter.owner)?;
    let total_pages = total_pages(total_records, filter.page_size);

    let query = PeriodQuery {
        period: filter.period,
        owner: filter.owner.clone(),
        offset,
        limit: filter.page_size,
    };
    let records = fetch(&query)?.into_iter().map(map).collect();

    Ok(Page {
        current_page: filter.page,
        total_pages,
        total_records,
        page_limit: filter.page_size,
        records,
    })
}
