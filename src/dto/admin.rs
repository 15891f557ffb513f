//! DTOs used by the admin listing pages.

use serde::Serialize;

use crate::domain::resource::ResourceKind;
use crate::query::{QueryParamSync, TableQueryState};
use crate::services::listing::resource_path;

/// Page sizes offered under every server-side table.
pub const PAGE_SIZE_CHOICES: [usize; 4] = [10, 25, 50, 100];

/// Navigation entry for one listing.
#[derive(Debug, Serialize)]
pub struct ResourceLink {
    pub slug: &'static str,
    pub title: &'static str,
    pub href: String,
    pub deletable: bool,
}

impl From<ResourceKind> for ResourceLink {
    fn from(resource: ResourceKind) -> Self {
        Self {
            slug: resource.slug(),
            title: resource.title(),
            href: resource_path(resource),
            deletable: resource.deletable(),
        }
    }
}

/// Every listing, in menu order.
pub fn resource_links() -> Vec<ResourceLink> {
    ResourceKind::ALL.into_iter().map(ResourceLink::from).collect()
}

/// Page-size selector entry.
#[derive(Debug, Serialize)]
pub struct PageSizeLink {
    pub size: usize,
    pub href: String,
    pub current: bool,
}

/// Links switching the page size, each returning to the first page.
pub fn page_size_links(sync: &QueryParamSync) -> Vec<PageSizeLink> {
    let current = sync.state().page_size;
    PAGE_SIZE_CHOICES
        .into_iter()
        .map(|size| PageSizeLink {
            size,
            href: sync
                .navigate(
                    &TableQueryState {
                        page_size: size,
                        ..sync.state().clone()
                    }
                    .reset_page(),
                )
                .href,
            current: size == current,
        })
        .collect()
}

/// Record shown on the delete confirmation page.
#[derive(Debug, Serialize)]
pub struct DeleteConfirmation {
    pub resource: ResourceLink,
    pub label: &'static str,
    pub id: String,
    pub action: String,
    pub return_to: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_size_links_reset_page_and_mark_current() {
        let sync = QueryParamSync::parse("/admin/products", "pageIndex=3&pageSize=25");

        let links = page_size_links(&sync);

        assert_eq!(links.len(), 4);
        assert_eq!(links[2].href, "/admin/products?pageIndex=0&pageSize=50");
        assert!(links[1].current);
        assert!(!links[0].current);
    }

    #[test]
    fn resource_links_cover_every_listing() {
        let links = resource_links();
        assert_eq!(links.len(), ResourceKind::ALL.len());
        assert_eq!(links[2].href, "/admin/orders");
        assert!(!links[2].deletable);
    }
}
