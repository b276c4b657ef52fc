//! The order-by scope.

use super::{NullOrdering, SortDirection, SortItem};

/// Collects ORDER BY items in declaration order.
#[derive(Debug, Default)]
pub struct OrderByScope {
    items: Vec<SortItem>,
}

impl OrderByScope {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn into_items(self) -> Vec<SortItem> {
        self.items
    }

    fn push(
        &mut self,
        property: &str,
        direction: SortDirection,
        nulls: Option<NullOrdering>,
    ) -> &mut Self {
        self.items.push(SortItem {
            property: property.to_owned(),
            direction,
            nulls,
        });
        self
    }

    /// `property ASC`
    pub fn asc(&mut self, property: &str) -> &mut Self {
        self.push(property, SortDirection::Asc, None)
    }

    /// `property DESC`
    pub fn desc(&mut self, property: &str) -> &mut Self {
        self.push(property, SortDirection::Desc, None)
    }

    /// `property ASC NULLS FIRST`
    pub fn asc_nulls_first(&mut self, property: &str) -> &mut Self {
        self.push(property, SortDirection::Asc, Some(NullOrdering::First))
    }

    /// `property ASC NULLS LAST`
    pub fn asc_nulls_last(&mut self, property: &str) -> &mut Self {
        self.push(property, SortDirection::Asc, Some(NullOrdering::Last))
    }

    /// `property DESC NULLS FIRST`
    pub fn desc_nulls_first(&mut self, property: &str) -> &mut Self {
        self.push(property, SortDirection::Desc, Some(NullOrdering::First))
    }

    /// `property DESC NULLS LAST`
    pub fn desc_nulls_last(&mut self, property: &str) -> &mut Self {
        self.push(property, SortDirection::Desc, Some(NullOrdering::Last))
    }
}
