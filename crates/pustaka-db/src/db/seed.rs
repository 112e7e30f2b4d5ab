//! Sample catalog data for demos and local development.

use chrono::NaiveDate;
use pustaka_core::models::BookInput;
use pustaka_core::AppError;

use super::repository::Catalog;

const SAMPLE_CATEGORIES: &[&str] = &["Fiksi", "Sains", "Sejarah", "Sastra Klasik"];

struct SampleBook {
    title: &'static str,
    author: &'static str,
    publication_date: (i32, u32, u32),
    publisher: &'static str,
    pages: i32,
    category: &'static str,
    image_url: &'static str,
}

const SAMPLE_BOOKS: &[SampleBook] = &[
    SampleBook {
        title: "Laut Bercerita",
        author: "Leila S. Chudori",
        publication_date: (2017, 10, 19),
        publisher: "Kepustakaan Populer Gramedia",
        pages: 390,
        category: "Fiksi",
        image_url: "/uploads/laut-bercerita.jpeg",
    },
    SampleBook {
        title: "White Nights",
        author: "Fyodor Dostoevsky",
        publication_date: (2016, 3, 3),
        publisher: "Penguin Classics",
        pages: 240,
        category: "Sastra Klasik",
        image_url: "/uploads/white-nights.jpeg",
    },
];

/// What a seeding run inserted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub categories: usize,
    pub books: usize,
}

/// Insert the sample categories and books into an empty catalog.
///
/// A catalog that already has categories is left untouched.
#[tracing::instrument(skip(catalog), fields(engine = catalog.engine_name()))]
pub async fn seed_catalog(catalog: &Catalog) -> Result<SeedReport, AppError> {
    if !catalog.categories.find_all().await?.is_empty() {
        tracing::info!("Catalog already has categories, skipping seed");
        return Ok(SeedReport::default());
    }

    let mut report = SeedReport::default();
    let mut created = Vec::with_capacity(SAMPLE_CATEGORIES.len());
    for name in SAMPLE_CATEGORIES {
        created.push(catalog.categories.create(name).await?);
        report.categories += 1;
    }

    for sample in SAMPLE_BOOKS {
        let Some(category) = created.iter().find(|c| c.name == sample.category) else {
            return Err(AppError::Internal(format!(
                "Sample category {} missing",
                sample.category
            )));
        };
        let (year, month, day) = sample.publication_date;
        let publication_date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
            AppError::Internal(format!("Invalid sample date for {}", sample.title))
        })?;

        catalog
            .books
            .create(&BookInput {
                title: sample.title.to_string(),
                author: sample.author.to_string(),
                publication_date,
                publisher: sample.publisher.to_string(),
                pages: sample.pages,
                category_id: category.id,
                image_url: sample.image_url.to_string(),
            })
            .await?;
        report.books += 1;
    }

    tracing::info!(
        categories = report.categories,
        books = report.books,
        "Catalog seeded"
    );
    Ok(report)
}
