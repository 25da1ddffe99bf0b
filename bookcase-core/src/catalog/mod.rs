//! The catalog store: the persisted book collection plus its sorted,
//! filtered views.
//!
//! Books are kept in the current sort order. When a search filter is set,
//! indices passed to [`Catalog::get`], [`Catalog::remove`] and
//! [`Catalog::update`] address the filtered view; otherwise they address the
//! whole collection. The filtered view is recomputed after every change to the
//! collection, the sort order or the filter.

mod document;
mod samples;
mod sort;

pub use document::FORMAT_VERSION;
pub use samples::sample_books;
pub use sort::{fold, matches, SortOrder};

use crate::error::CatalogError;
use crate::storage::{LocalStorage, StorageProvider};
use crate::types::Book;
use std::cell::OnceCell;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// File the collection is persisted to
pub const CATALOG_FILE: &str = "books.json";

/// A catalog shared between several callers
pub type SharedCatalog = Arc<Mutex<Catalog>>;

/// One entry of the filtered view
#[derive(Debug, Clone, Copy)]
struct ViewEntry {
    position: usize,
    id: Uuid,
}

/// The book collection with its sort order, search filter and filtered view
pub struct Catalog {
    storage: Arc<dyn StorageProvider>,
    items: OnceCell<Vec<Book>>,
    sort_order: SortOrder,
    search_filter: String,
    view: OnceCell<Vec<ViewEntry>>,
}

impl Catalog {
    /// Create a catalog backed by `storage`. Nothing is read until first access.
    pub fn new(storage: Arc<dyn StorageProvider>) -> Self {
        Self {
            storage,
            items: OnceCell::new(),
            sort_order: SortOrder::default(),
            search_filter: String::new(),
            view: OnceCell::new(),
        }
    }

    /// Catalog stored in `data_dir` on the local filesystem
    pub fn open(data_dir: impl AsRef<Path>) -> Self {
        Self::new(Arc::new(LocalStorage::new(data_dir.as_ref())))
    }

    /// Wrap the catalog for shared use
    pub fn into_shared(self) -> SharedCatalog {
        Arc::new(Mutex::new(self))
    }

    /// Whether the collection has been read from storage yet
    pub fn is_loaded(&self) -> bool {
        self.items.get().is_some()
    }

    /// Drop in-memory state; the next access reads storage again
    pub fn reload(&mut self) {
        self.items = OnceCell::new();
        self.view = OnceCell::new();
    }

    pub fn sort_order(&self) -> SortOrder {
        self.sort_order
    }

    pub fn search_filter(&self) -> &str {
        &self.search_filter
    }

    /// Whether indices currently address the filtered view
    pub fn is_filtering(&self) -> bool {
        !self.search_filter.is_empty()
    }

    /// Number of books in the active sequence
    pub fn count(&self) -> usize {
        if self.is_filtering() {
            self.view().len()
        } else {
            self.items().len()
        }
    }

    /// Number of books in the whole collection, ignoring the filter
    pub fn len(&self) -> usize {
        self.items().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items().is_empty()
    }

    /// Book at `index` in the active sequence
    pub fn get(&self, index: usize) -> Result<&Book, CatalogError> {
        let position = self.resolve(index)?;
        Ok(&self.items()[position])
    }

    /// Iterate over the active sequence in display order
    pub fn iter(&self) -> impl Iterator<Item = &Book> + '_ {
        (0..self.count()).filter_map(move |index| self.get(index).ok())
    }

    /// Every book, ignoring the filter
    pub fn all(&self) -> &[Book] {
        self.items()
    }

    /// Add a book, keeping the collection sorted
    pub fn add(&mut self, book: Book) {
        debug!("Adding book {} ({})", book.title, book.id);
        let order = self.sort_order;
        let items = self.items_mut();
        items.push(book);
        order.sort(items);
        self.refresh_view();
        self.persist();
    }

    /// Remove the book at `index` in the active sequence
    pub fn remove(&mut self, index: usize) -> Result<Book, CatalogError> {
        let position = self.resolve(index)?;
        let removed = self.items_mut().remove(position);
        debug!("Removed book {} ({})", removed.title, removed.id);
        self.refresh_view();
        self.persist();
        Ok(removed)
    }

    /// Replace the book at `index` in the active sequence.
    /// The replacement takes over the identity of the book it replaces.
    pub fn update(&mut self, index: usize, mut book: Book) -> Result<(), CatalogError> {
        let position = self.resolve(index)?;
        let order = self.sort_order;
        let items = self.items_mut();
        book.id = items[position].id;
        debug!("Updating book {} ({})", book.title, book.id);
        items[position] = book;
        order.sort(items);
        self.refresh_view();
        self.persist();
        Ok(())
    }

    /// Change the sort order and re-sort the collection
    pub fn set_sort_order(&mut self, order: SortOrder) {
        self.sort_order = order;
        order.sort(self.items_mut());
        self.refresh_view();
    }

    /// Change the search filter; an empty filter shows every book
    pub fn set_search_filter(&mut self, filter: impl Into<String>) {
        self.search_filter = filter.into();
        self.refresh_view();
    }

    /// Map an index in the active sequence to a position in the collection
    fn resolve(&self, index: usize) -> Result<usize, CatalogError> {
        let len = self.count();
        if index >= len {
            return Err(CatalogError::IndexOutOfRange { index, len });
        }
        if !self.is_filtering() {
            return Ok(index);
        }

        let entry = self.view()[index];
        let items = self.items();
        match items.get(entry.position) {
            Some(book) if book.id == entry.id => Ok(entry.position),
            _ => {
                warn!("Filtered view is stale for book {}", entry.id);
                items
                    .iter()
                    .position(|book| book.id == entry.id)
                    .ok_or(CatalogError::Inconsistent(entry.id))
            }
        }
    }

    fn refresh_view(&mut self) {
        let view = self.build_view();
        self.view = OnceCell::from(view);
    }

    fn view(&self) -> &[ViewEntry] {
        self.view.get_or_init(|| self.build_view())
    }

    fn build_view(&self) -> Vec<ViewEntry> {
        if !self.is_filtering() {
            return Vec::new();
        }
        let needle = fold(&self.search_filter);
        self.items()
            .iter()
            .enumerate()
            .filter(|(_, book)| matches(book, &needle))
            .map(|(position, book)| ViewEntry {
                position,
                id: book.id,
            })
            .collect()
    }

    fn items(&self) -> &Vec<Book> {
        self.items
            .get_or_init(|| load(self.storage.as_ref(), self.sort_order))
    }

    fn items_mut(&mut self) -> &mut Vec<Book> {
        self.items();
        match self.items.get_mut() {
            Some(items) => items,
            None => unreachable!("catalog items are initialized by items()"),
        }
    }

    /// Save the whole collection. Failures are logged; memory stays authoritative.
    fn persist(&self) {
        match document::write(self.storage.as_ref(), CATALOG_FILE, self.items()) {
            Ok(()) => info!("Saved catalog ({} books)", self.items().len()),
            Err(e) => warn!("Failed to save catalog: {}", e),
        }
    }
}

fn load(storage: &dyn StorageProvider, order: SortOrder) -> Vec<Book> {
    let mut books = match document::read(storage, CATALOG_FILE) {
        Ok(Some(books)) => {
            info!("Loaded catalog ({} books)", books.len());
            books
        }
        Ok(None) => {
            info!("No saved catalog, starting from sample books");
            sample_books(order)
        }
        Err(e) => {
            warn!("Failed to load catalog, starting from sample books: {}", e);
            sample_books(order)
        }
    };
    order.sort(&mut books);
    books
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn empty_catalog() -> (Catalog, Arc<MemoryStorage>) {
        let storage = Arc::new(MemoryStorage::new());
        document::write(storage.as_ref(), CATALOG_FILE, &[]).unwrap();
        (Catalog::new(storage.clone()), storage)
    }

    fn titles(catalog: &Catalog) -> Vec<String> {
        catalog.iter().map(|b| b.title.clone()).collect()
    }

    #[test]
    fn test_loads_lazily_and_seeds_samples() {
        let storage = Arc::new(MemoryStorage::new());
        let catalog = Catalog::new(storage.clone());
        assert!(!catalog.is_loaded());

        assert_eq!(catalog.count(), 15);
        assert!(catalog.is_loaded());
        assert_eq!(catalog.get(0).unwrap().title, "Animal Farm");

        // Seeding alone doesn't write anything
        assert!(!storage.exists(CATALOG_FILE).unwrap());
    }

    #[test]
    fn test_add_keeps_sorted_and_persists() {
        let (mut catalog, storage) = empty_catalog();
        catalog.add(Book::new("Persuasion", "Jane Austen"));
        catalog.add(Book::new("Emma", "Jane Austen"));
        catalog.add(Book::new("Animal Farm", "George Orwell"));

        assert_eq!(titles(&catalog), vec!["Animal Farm", "Emma", "Persuasion"]);

        let saved = document::read(storage.as_ref(), CATALOG_FILE)
            .unwrap()
            .unwrap();
        assert_eq!(saved, catalog.all());
    }

    #[test]
    fn test_get_out_of_range() {
        let (mut catalog, _) = empty_catalog();
        assert_eq!(
            catalog.get(0),
            Err(CatalogError::IndexOutOfRange { index: 0, len: 0 })
        );

        catalog.add(Book::new("Emma", "Jane Austen"));
        catalog.set_search_filter("orwell");
        assert_eq!(
            catalog.remove(0),
            Err(CatalogError::IndexOutOfRange { index: 0, len: 0 })
        );
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_filter_is_recomputed_after_add() {
        let (mut catalog, _) = empty_catalog();
        catalog.add(Book::new("Emma", "Jane Austen"));
        catalog.set_search_filter("austen");
        assert_eq!(catalog.count(), 1);

        catalog.add(Book::new("Persuasion", "Jane Austen"));
        catalog.add(Book::new("Animal Farm", "George Orwell"));
        assert_eq!(catalog.count(), 2);
        assert_eq!(titles(&catalog), vec!["Emma", "Persuasion"]);

        catalog.set_search_filter("");
        assert_eq!(catalog.count(), 3);
    }

    #[test]
    fn test_filtered_remove_targets_matching_book() {
        let (mut catalog, _) = empty_catalog();
        catalog.add(Book::new("Emma", "Jane Austen"));
        catalog.add(Book::new("Animal Farm", "George Orwell"));
        catalog.add(Book::new("Persuasion", "Jane Austen"));

        catalog.set_search_filter("AUSTEN");
        let removed = catalog.remove(1).unwrap();
        assert_eq!(removed.title, "Persuasion");
        assert_eq!(catalog.count(), 1);
        assert_eq!(catalog.len(), 2);

        catalog.set_search_filter("");
        assert_eq!(titles(&catalog), vec!["Animal Farm", "Emma"]);
    }

    #[test]
    fn test_filtered_remove_with_duplicates_removes_one() {
        let (mut catalog, _) = empty_catalog();
        let book = Book::new("Emma", "Jane Austen");
        let twin = Book {
            id: Uuid::new_v4(),
            ..book.clone()
        };
        catalog.add(book);
        catalog.add(twin);

        catalog.set_search_filter("emma");
        catalog.remove(0).unwrap();
        assert_eq!(catalog.count(), 1);
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_update_resorts_and_keeps_identity() {
        let (mut catalog, _) = empty_catalog();
        catalog.add(Book::new("Animal Farm", "George Orwell"));
        catalog.add(Book::new("Emma", "Jane Austen"));
        let id = catalog.get(0).unwrap().id;

        catalog
            .update(0, Book::new("Nineteen Eighty-Four", "George Orwell").with_rating(5))
            .unwrap();

        assert_eq!(titles(&catalog), vec!["Emma", "Nineteen Eighty-Four"]);
        let updated = catalog.get(1).unwrap();
        assert_eq!(updated.id, id);
        assert_eq!(updated.rating, 5);
    }

    #[test]
    fn test_filtered_update_can_drop_book_from_view() {
        let (mut catalog, _) = empty_catalog();
        catalog.add(Book::new("Emma", "Jane Austen"));
        catalog.add(Book::new("Persuasion", "Jane Austen"));

        catalog.set_search_filter("persuasion");
        let mut edited = catalog.get(0).unwrap().clone();
        edited.title = "Sanditon".to_string();
        catalog.update(0, edited).unwrap();

        assert_eq!(catalog.count(), 0);
        catalog.set_search_filter("sanditon");
        assert_eq!(catalog.count(), 1);
    }

    #[test]
    fn test_sort_order_change_reorders_view() {
        let (mut catalog, _) = empty_catalog();
        catalog.add(Book::new("Zazie dans le métro", "Raymond Queneau"));
        catalog.add(Book::new("Exercices de style", "Raymond Queneau"));
        catalog.add(Book::new("Animal Farm", "George Orwell"));

        catalog.set_search_filter("a");
        assert_eq!(
            titles(&catalog),
            vec!["Animal Farm", "Exercices de style", "Zazie dans le métro"]
        );

        catalog.set_sort_order(SortOrder::AuthorThenTitle);
        assert_eq!(catalog.search_filter(), "a");
        assert_eq!(catalog.get(0).unwrap().author, "George Orwell");
        assert_eq!(catalog.get(1).unwrap().title, "Exercices de style");
    }

    #[test]
    fn test_save_failure_keeps_memory_state() {
        let (mut catalog, storage) = empty_catalog();
        storage.set_fail_writes(true);

        catalog.add(Book::new("Emma", "Jane Austen"));
        assert_eq!(catalog.count(), 1);

        let saved = document::read(storage.as_ref(), CATALOG_FILE)
            .unwrap()
            .unwrap();
        assert!(saved.is_empty());
    }

    #[test]
    fn test_loaded_rating_stays_in_range() {
        let storage = Arc::new(MemoryStorage::new());
        storage
            .write(
                CATALOG_FILE,
                br#"{"version":1,"books":[{"id":"67e55044-10b1-426f-9247-bb680e5fe0c8","title":"Emma","author":"Jane Austen","rating":200}]}"#,
            )
            .unwrap();
        let catalog = Catalog::new(storage);
        assert_eq!(catalog.get(0).unwrap().rating, 5);
    }

    #[test]
    fn test_corrupt_file_falls_back_to_samples() {
        let storage = Arc::new(MemoryStorage::new());
        storage.write(CATALOG_FILE, b"{ definitely not a catalog").unwrap();
        let catalog = Catalog::new(storage);
        assert_eq!(catalog.count(), 15);
    }

    #[test]
    fn test_reload_reads_storage_again() {
        let (mut catalog, storage) = empty_catalog();
        catalog.add(Book::new("Emma", "Jane Austen"));

        let mut other = Catalog::new(storage);
        other.add(Book::new("Persuasion", "Jane Austen"));

        assert_eq!(catalog.len(), 1);
        catalog.reload();
        assert!(!catalog.is_loaded());
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn test_reload_with_filter_defers_loading() {
        let (mut catalog, storage) = empty_catalog();
        catalog.add(Book::new("Emma", "Jane Austen"));
        catalog.set_search_filter("austen");

        let mut other = Catalog::new(storage);
        other.add(Book::new("Persuasion", "Jane Austen"));
        other.add(Book::new("Walden", "Henry David Thoreau"));

        catalog.reload();
        assert!(!catalog.is_loaded());
        assert_eq!(catalog.search_filter(), "austen");

        assert_eq!(catalog.count(), 2);
        assert!(catalog.is_loaded());
        assert_eq!(catalog.get(1).unwrap().title, "Persuasion");
    }
}
