//! Book list query builder
//!
//! Turns the untyped query string sent by the data-grid widget into a typed
//! [`BookListQuery`]. Every option has its own fallback, so malformed input degrades to
//! defaults instead of failing the request. The same query renders to SQL for PostgreSQL
//! and evaluates directly against rows for the in-memory engine.

use std::cmp::Ordering;
use std::collections::HashMap;

use chrono::NaiveDate;
use pustaka_core::models::Book;
use pustaka_core::CatalogConfig;

/// Columns the grid may sort by. Anything else falls back to `CreatedAt`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortColumn {
    Title,
    Author,
    Publisher,
    PublicationDate,
    Pages,
    #[default]
    CreatedAt,
}

impl SortColumn {
    /// Look up a column by its wire name (`publicationDate`, ...).
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "title" => Some(SortColumn::Title),
            "author" => Some(SortColumn::Author),
            "publisher" => Some(SortColumn::Publisher),
            "publicationDate" => Some(SortColumn::PublicationDate),
            "pages" => Some(SortColumn::Pages),
            "createdAt" => Some(SortColumn::CreatedAt),
            _ => None,
        }
    }

    pub fn sql_column(&self) -> &'static str {
        match self {
            SortColumn::Title => "b.title",
            SortColumn::Author => "b.author",
            SortColumn::Publisher => "b.publisher",
            SortColumn::PublicationDate => "b.publication_date",
            SortColumn::Pages => "b.pages",
            SortColumn::CreatedAt => "b.created_at",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// `desc` in any case is descending; everything else is ascending.
    pub fn from_param(raw: Option<&str>) -> Self {
        match raw {
            Some(dir) if dir.trim().eq_ignore_ascii_case("desc") => SortDirection::Desc,
            _ => SortDirection::Asc,
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }

    fn apply(&self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

/// A bound value for the SQL rendering of the filter predicate, in placeholder order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterArg {
    Int(i32),
    Date(NaiveDate),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookListQuery {
    /// Echo counter returned unchanged to the grid.
    pub draw: i64,
    pub start: i64,
    pub length: i64,
    /// Trimmed, non-empty free text.
    pub search: Option<String>,
    pub category_id: Option<i32>,
    pub pub_date_from: Option<NaiveDate>,
    pub pub_date_to: Option<NaiveDate>,
    pub sort: SortColumn,
    pub direction: SortDirection,
}

impl Default for BookListQuery {
    fn default() -> Self {
        Self::from_params(&HashMap::new(), &CatalogConfig::default())
    }
}

/// Trimmed, non-empty parameter value.
fn param<'a>(params: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    params.get(key).map(|v| v.trim()).filter(|v| !v.is_empty())
}

fn parse_date(raw: Option<&str>) -> Option<NaiveDate> {
    raw.and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
}

impl BookListQuery {
    /// Build a query from the grid's query string parameters.
    pub fn from_params(params: &HashMap<String, String>, policy: &CatalogConfig) -> Self {
        let draw = param(params, "draw").and_then(|v| v.parse().ok()).unwrap_or(1);

        let start = param(params, "start")
            .and_then(|v| v.parse::<i64>().ok())
            .filter(|v| *v >= 0)
            .unwrap_or(0);

        let length = param(params, "length")
            .and_then(|v| v.parse::<i64>().ok())
            .filter(|v| *v >= 1)
            .unwrap_or(policy.default_page_length)
            .min(policy.max_page_length);

        let search = param(params, "search[value]").map(str::to_string);

        let category_id = param(params, "categoryId").and_then(|v| v.parse::<i32>().ok());

        let pub_date_from = parse_date(param(params, "pubDateFrom"));
        let pub_date_to = parse_date(param(params, "pubDateTo"));

        let sort = param(params, "order[0][column]")
            .and_then(|index| param(params, &format!("columns[{}][data]", index)))
            .and_then(SortColumn::from_name)
            .unwrap_or_default();

        let direction = SortDirection::from_param(param(params, "order[0][dir]"));

        Self {
            draw,
            start,
            length,
            search,
            category_id,
            pub_date_from,
            pub_date_to,
            sort,
            direction,
        }
    }

    /// Render the filter predicate as a `WHERE` clause over `books b`, numbering
    /// placeholders from `$1`. Returns the clause (empty when unfiltered) and its arguments.
    pub fn where_sql(&self) -> (String, Vec<FilterArg>) {
        let mut where_parts: Vec<String> = Vec::new();
        let mut args: Vec<FilterArg> = Vec::new();
        let mut param_index = 1;

        if let Some(category_id) = self.category_id {
            where_parts.push(format!("b.category_id = ${}", param_index));
            args.push(FilterArg::Int(category_id));
            param_index += 1;
        }

        if let Some(from) = self.pub_date_from {
            where_parts.push(format!("b.publication_date >= ${}", param_index));
            args.push(FilterArg::Date(from));
            param_index += 1;
        }

        if let Some(to) = self.pub_date_to {
            where_parts.push(format!("b.publication_date <= ${}", param_index));
            args.push(FilterArg::Date(to));
            param_index += 1;
        }

        if let Some(search) = &self.search {
            let escaped = search
                .replace('\\', "\\\\")
                .replace('%', "\\%")
                .replace('_', "\\_");
            where_parts.push(format!(
                "(b.title ILIKE ${0} OR b.author ILIKE ${0} OR b.publisher ILIKE ${0})",
                param_index
            ));
            args.push(FilterArg::Text(format!("%{}%", escaped)));
        }

        if where_parts.is_empty() {
            (String::new(), args)
        } else {
            (format!("WHERE {}", where_parts.join(" AND ")), args)
        }
    }

    /// `ORDER BY` clause with an id tiebreaker in the same direction.
    pub fn order_sql(&self) -> String {
        let dir = self.direction.as_sql();
        format!("ORDER BY {} {}, b.id {}", self.sort.sql_column(), dir, dir)
    }

    /// Whether a book satisfies the filter predicate.
    pub fn matches(&self, book: &Book) -> bool {
        if let Some(category_id) = self.category_id {
            if book.category_id != category_id {
                return false;
            }
        }
        if let Some(from) = self.pub_date_from {
            if book.publication_date < from {
                return false;
            }
        }
        if let Some(to) = self.pub_date_to {
            if book.publication_date > to {
                return false;
            }
        }
        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            let hit = [&book.title, &book.author, &book.publisher]
                .iter()
                .any(|field| field.to_lowercase().contains(&needle));
            if !hit {
                return false;
            }
        }
        true
    }

    /// Grid ordering of two books: the sort column, then id, both in the query's direction.
    pub fn compare(&self, a: &Book, b: &Book) -> Ordering {
        let primary = match self.sort {
            SortColumn::Title => a.title.cmp(&b.title),
            SortColumn::Author => a.author.cmp(&b.author),
            SortColumn::Publisher => a.publisher.cmp(&b.publisher),
            SortColumn::PublicationDate => a.publication_date.cmp(&b.publication_date),
            SortColumn::Pages => a.pages.cmp(&b.pages),
            SortColumn::CreatedAt => a.created_at.cmp(&b.created_at),
        };
        self.direction.apply(primary.then(a.id.cmp(&b.id)))
    }

    /// Row offset as `usize` for slicing in memory.
    pub fn offset(&self) -> usize {
        usize::try_from(self.start).unwrap_or(usize::MAX)
    }

    pub fn limit(&self) -> usize {
        usize::try_from(self.length).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn query(pairs: &[(&str, &str)]) -> BookListQuery {
        BookListQuery::from_params(&params(pairs), &CatalogConfig::default())
    }

    fn book(id: i32, title: &str, pages: i32, category_id: i32, date: (i32, u32, u32)) -> Book {
        let created = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        Book {
            id,
            title: title.to_string(),
            author: "Penulis".to_string(),
            publication_date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            publisher: "Penerbit".to_string(),
            pages,
            category_id,
            image_url: format!("/uploads/{}.jpg", id),
            created_at: created,
            updated_at: created,
        }
    }

    #[test]
    fn empty_params_use_defaults() {
        let q = query(&[]);
        assert_eq!(q.draw, 1);
        assert_eq!(q.start, 0);
        assert_eq!(q.length, 10);
        assert_eq!(q.search, None);
        assert_eq!(q.category_id, None);
        assert_eq!(q.sort, SortColumn::CreatedAt);
        assert_eq!(q.direction, SortDirection::Asc);
        assert_eq!(q, BookListQuery::default());
    }

    #[test]
    fn malformed_numbers_fall_back() {
        let q = query(&[
            ("draw", "x"),
            ("start", "-5"),
            ("length", "0"),
            ("categoryId", "abc"),
        ]);
        assert_eq!(q.draw, 1);
        assert_eq!(q.start, 0);
        assert_eq!(q.length, 10);
        assert_eq!(q.category_id, None);

        assert_eq!(query(&[("length", "ten")]).length, 10);
        assert_eq!(query(&[("start", "2.5")]).start, 0);
    }

    #[test]
    fn length_is_capped() {
        assert_eq!(query(&[("length", "500")]).length, 100);
        assert_eq!(query(&[("length", "25")]).length, 25);
    }

    #[test]
    fn sort_column_resolves_through_columns_array() {
        let q = query(&[
            ("order[0][column]", "2"),
            ("columns[2][data]", "publicationDate"),
            ("order[0][dir]", "DESC"),
        ]);
        assert_eq!(q.sort, SortColumn::PublicationDate);
        assert_eq!(q.direction, SortDirection::Desc);
        assert_eq!(
            q.order_sql(),
            "ORDER BY b.publication_date DESC, b.id DESC"
        );
    }

    #[test]
    fn unknown_sort_column_falls_back_to_created_at() {
        let q = query(&[("order[0][column]", "0"), ("columns[0][data]", "nonexistent")]);
        assert_eq!(q.sort, SortColumn::CreatedAt);

        let q = query(&[("order[0][column]", "3")]);
        assert_eq!(q.sort, SortColumn::CreatedAt);

        let q = query(&[("order[0][column]", "0"), ("columns[0][data]", "id; DROP TABLE books")]);
        assert_eq!(q.sort, SortColumn::CreatedAt);
    }

    #[test]
    fn only_desc_sorts_descending() {
        for dir in ["desc", "DESC", "Desc", " desc "] {
            assert_eq!(SortDirection::from_param(Some(dir)), SortDirection::Desc);
        }
        for dir in ["asc", "descending", "", "up"] {
            assert_eq!(SortDirection::from_param(Some(dir)), SortDirection::Asc);
        }
        assert_eq!(SortDirection::from_param(None), SortDirection::Asc);
    }

    #[test]
    fn malformed_dates_are_ignored_per_bound() {
        let q = query(&[("pubDateFrom", "2020-01-01"), ("pubDateTo", "someday")]);
        assert_eq!(q.pub_date_from, NaiveDate::from_ymd_opt(2020, 1, 1));
        assert_eq!(q.pub_date_to, None);
    }

    #[test]
    fn where_sql_numbers_placeholders_in_bind_order() {
        let q = query(&[
            ("categoryId", "3"),
            ("pubDateTo", "2020-12-31"),
            ("search[value]", "  50%_off\\  "),
        ]);
        let (sql, args) = q.where_sql();
        assert_eq!(
            sql,
            "WHERE b.category_id = $1 AND b.publication_date <= $2 AND \
             (b.title ILIKE $3 OR b.author ILIKE $3 OR b.publisher ILIKE $3)"
        );
        assert_eq!(
            args,
            vec![
                FilterArg::Int(3),
                FilterArg::Date(NaiveDate::from_ymd_opt(2020, 12, 31).unwrap()),
                FilterArg::Text("%50\\%\\_off\\\\%".to_string()),
            ]
        );
    }

    #[test]
    fn unfiltered_query_has_no_where_clause() {
        let (sql, args) = query(&[("search[value]", "   ")]).where_sql();
        assert!(sql.is_empty());
        assert!(args.is_empty());
    }

    #[test]
    fn matches_combines_all_filters() {
        let b = book(1, "Laut Bercerita", 390, 1, (2017, 10, 19));

        assert!(query(&[]).matches(&b));
        assert!(query(&[("categoryId", "1")]).matches(&b));
        assert!(!query(&[("categoryId", "2")]).matches(&b));
        assert!(query(&[("search[value]", "laut")]).matches(&b));
        assert!(query(&[("search[value]", "PENERBIT")]).matches(&b));
        assert!(!query(&[("search[value]", "malam")]).matches(&b));
        assert!(query(&[("pubDateFrom", "2017-10-19"), ("pubDateTo", "2017-10-19")]).matches(&b));
        assert!(!query(&[("pubDateFrom", "2017-10-20")]).matches(&b));
        assert!(!query(&[("pubDateTo", "2017-10-18")]).matches(&b));
    }

    #[test]
    fn search_wildcards_match_literally() {
        let plain = book(1, "Diskon 50 persen", 100, 1, (2020, 1, 1));
        let percent = book(2, "Diskon 50% persen", 100, 1, (2020, 1, 1));
        let q = query(&[("search[value]", "50%")]);
        assert!(!q.matches(&plain));
        assert!(q.matches(&percent));
    }

    #[test]
    fn compare_breaks_ties_by_id_in_direction() {
        let a = book(1, "Sama", 100, 1, (2020, 1, 1));
        let b = book(2, "Sama", 100, 1, (2020, 1, 1));
        let asc = query(&[("order[0][column]", "0"), ("columns[0][data]", "title")]);
        assert_eq!(asc.compare(&a, &b), Ordering::Less);

        let desc = query(&[
            ("order[0][column]", "0"),
            ("columns[0][data]", "pages"),
            ("order[0][dir]", "desc"),
        ]);
        assert_eq!(desc.compare(&a, &b), Ordering::Greater);
    }
}
