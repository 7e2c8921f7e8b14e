use soroban_sdk::Env;

use crate::config::MAX_PAGE_SIZE;
use crate::errors::GovernanceError;
use crate::pending;
use crate::signers;
use crate::types::{PageInfo, PendingPage, SignerPage};

/// Resolves `page` of `page_size` over `total_count` items into the page
/// metadata and the half-open item range it covers.
pub fn bounds(
    total_count: u32,
    page: u32,
    page_size: u32,
) -> Result<(PageInfo, u32, u32), GovernanceError> {
    if page_size == 0 || page_size > MAX_PAGE_SIZE {
        return Err(GovernanceError::InvalidPageSize);
    }

    let total_pages = total_count.div_ceil(page_size);
    // Page 0 of an empty collection is an empty page, not an error.
    if page >= total_pages && !(page == 0 && total_count == 0) {
        return Err(GovernanceError::PageOutOfBounds);
    }

    let start = page * page_size;
    let end = (start + page_size).min(total_count);
    let info = PageInfo {
        page,
        page_size,
        total_count,
        total_pages,
    };
    Ok((info, start, end))
}

pub fn pending_page(env: &Env, page: u32, page_size: u32) -> Result<PendingPage, GovernanceError> {
    let (info, start, end) = bounds(pending::count(env), page, page_size)?;
    Ok(PendingPage {
        ids: pending::range(env, start, end),
        info,
    })
}

pub fn signer_page(env: &Env, page: u32, page_size: u32) -> Result<SignerPage, GovernanceError> {
    let all = signers::all(env);
    let (info, start, end) = bounds(all.len(), page, page_size)?;
    Ok(SignerPage {
        signers: all.slice(start..end),
        info,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_last_page_is_short() {
        let (info, start, end) = bounds(13, 2, 5).unwrap();
        assert_eq!(info.total_pages, 3);
        assert_eq!((start, end), (10, 13));
    }

    #[test]
    fn test_bounds_empty_collection() {
        let (info, start, end) = bounds(0, 0, 5).unwrap();
        assert_eq!(info.total_pages, 0);
        assert_eq!((start, end), (0, 0));
        assert_eq!(bounds(0, 1, 5), Err(GovernanceError::PageOutOfBounds));
    }

    #[test]
    fn test_bounds_rejects_bad_sizes() {
        assert_eq!(bounds(10, 0, 0), Err(GovernanceError::InvalidPageSize));
        assert_eq!(
            bounds(10, 0, MAX_PAGE_SIZE + 1),
            Err(GovernanceError::InvalidPageSize)
        );
        assert_eq!(bounds(10, 999, 5), Err(GovernanceError::PageOutOfBounds));
    }

    #[test]
    fn test_bounds_cover_every_item_once() {
        for total in 0..40u32 {
            for size in 1..=12u32 {
                let mut next = 0;
                let mut page = 0;
                while let Ok((info, start, end)) = bounds(total, page, size) {
                    assert_eq!(start, next);
                    assert!(end - start <= size);
                    next = end;
                    page += 1;
                    if page >= info.total_pages {
                        break;
                    }
                }
                assert_eq!(next, total);
            }
        }
    }
}
