use domain::tally::{PageLinks, PageRequest};

/// Builds first/last/previous/next links for a paged report
pub struct PageLinkCreator;

impl PageLinkCreator {
    /// `request_uri` is the path and query of the current request; any
    /// `offset`/`limit` it carries are replaced.
    pub fn links(request_uri: &str, page: PageRequest, total: u64) -> PageLinks {
        let limit = u64::from(page.limit.max(1));
        let offset = u64::from(page.offset);
        let last_offset = total.saturating_sub(1) / limit * limit;

        PageLinks {
            first: with_page(request_uri, 0, limit),
            last: with_page(request_uri, last_offset, limit),
            previous: (offset > 0).then(|| with_page(request_uri, offset.saturating_sub(limit), limit)),
            next: (offset + limit < total).then(|| with_page(request_uri, offset + limit, limit)),
        }
    }
}

fn with_page(request_uri: &str, offset: u64, limit: u64) -> String {
    let (path, query) = request_uri.split_once('?').unwrap_or((request_uri, ""));
    let mut params: Vec<String> = query
        .split('&')
        .filter(|param| !param.is_empty())
        .filter(|param| !param.starts_with("offset=") && !param.starts_with("limit="))
        .map(str::to_string)
        .collect();
    params.push(format!("offset={offset}"));
    params.push(format!("limit={limit}"));
    format!("{path}?{}", params.join("&"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const URI: &str = "/api/v1/tally/products/RHEL?granularity=DAILY&offset=10&limit=10";

    #[test]
    fn test_middle_page() {
        let links = PageLinkCreator::links(URI, PageRequest { offset: 10, limit: 10 }, 35);
        assert_eq!(links.first, "/api/v1/tally/products/RHEL?granularity=DAILY&offset=0&limit=10");
        assert_eq!(links.last, "/api/v1/tally/products/RHEL?granularity=DAILY&offset=30&limit=10");
        assert_eq!(
            links.previous.as_deref(),
            Some("/api/v1/tally/products/RHEL?granularity=DAILY&offset=0&limit=10")
        );
        assert_eq!(
            links.next.as_deref(),
            Some("/api/v1/tally/products/RHEL?granularity=DAILY&offset=20&limit=10")
        );
    }

    #[test]
    fn test_first_and_only_page() {
        let links = PageLinkCreator::links("/tally", PageRequest { offset: 0, limit: 10 }, 4);
        assert_eq!(links.first, "/tally?offset=0&limit=10");
        assert_eq!(links.last, "/tally?offset=0&limit=10");
        assert_eq!(links.previous, None);
        assert_eq!(links.next, None);
    }

    #[test]
    fn test_empty_result() {
        let links = PageLinkCreator::links("/tally", PageRequest { offset: 0, limit: 5 }, 0);
        assert_eq!(links.last, "/tally?offset=0&limit=5");
        assert_eq!(links.next, None);
    }
}
