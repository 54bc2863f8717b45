use crate::error::Error;
use crate::mir::{Query, Sort};
use crate::schema::FieldSchema;

/// The filter and sort used to select items of a resource collection.
///
/// A lookup is built for a single request, while its parameters get parsed, and then handed
/// to the storage.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Lookup {
    filter: Query,
    sort: Vec<Sort>,
}

impl Lookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// The filter, a conjunction of all added queries.
    pub fn filter(&self) -> &Query {
        &self.filter
    }

    /// The sort keys, primary first.
    pub fn sort(&self) -> &[Sort] {
        &self.sort
    }

    /// Parse and validate a sort text, e.g. `name,-created`, replacing the current sort.
    ///
    /// On error, the current sort is kept.
    pub fn set_sort<S: FieldSchema + ?Sized>(
        &mut self,
        sort: &str,
        schema: &S,
    ) -> Result<(), Error> {
        self.sort = Sort::parse_list(sort, schema)?;
        tracing::trace!(sort, keys = self.sort.len(), "set lookup sort");
        Ok(())
    }

    /// Parse and validate a filter text, and add it to the filter.
    ///
    /// On error, the current filter is kept.
    pub fn add_filter<S: FieldSchema + ?Sized>(
        &mut self,
        filter: &str,
        schema: &S,
    ) -> Result<(), Error> {
        let query = Query::parse(filter, schema)?;
        self.add_query(query);
        Ok(())
    }

    /// Add an already validated query to the filter.
    pub fn add_query(&mut self, query: Query) {
        tracing::trace!(expressions = query.len(), "adding query to lookup");
        if self.filter.is_empty() {
            self.filter = query;
        } else {
            self.filter.append(query);
        }
    }
}
