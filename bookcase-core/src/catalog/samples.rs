//! Seed collection used when no catalog has been saved yet

use super::SortOrder;
use crate::types::Book;

const SAMPLES: [(&str, &str, u8); 15] = [
    ("Great Expectations", "Charles Dickens", 5),
    ("Don Quixote", "Miguel De Cervantes", 4),
    ("Robinson Crusoe", "Daniel Defoe", 5),
    ("Gulliver's Travels", "Jonathan Swift", 5),
    ("Emma", "Jane Austen", 5),
    ("To Kill a Mockingbird", "Harper Lee", 5),
    ("Animal Farm", "George Orwell", 4),
    ("Gone with the Wind", "Margaret Mitchell", 5),
    ("The Fault in Our Stars", "John Green", 5),
    ("The Da Vinci Code", "Dan Brown", 5),
    ("Les Misérables ", "Victor Hugo", 5),
    ("Lord of the Flies ", "William Golding", 5),
    ("The Alchemist", "Paulo Coelho", 5),
    ("Life of Pi", "Yann Martel", 5),
    ("The Odyssey", "Homer", 5),
];

/// The sample books, sorted under `order`
pub fn sample_books(order: SortOrder) -> Vec<Book> {
    let mut books: Vec<Book> = SAMPLES
        .iter()
        .map(|&(title, author, rating)| Book::new(title, author).with_rating(rating))
        .collect();

    books[0] = books[0]
        .clone()
        .with_isbn("9780140817997")
        .with_notes("🎁 from Papa");
    books[1] = books[1].clone().with_isbn("9788471890153");

    order.sort(&mut books);
    books
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_books() {
        let books = sample_books(SortOrder::default());
        assert_eq!(books.len(), 15);
        assert_eq!(books.first().unwrap().title, "Animal Farm");
        assert_eq!(books.last().unwrap().title, "To Kill a Mockingbird");

        let annotated: Vec<_> = books
            .iter()
            .filter(|b| !b.isbn.is_empty() || !b.notes.is_empty())
            .map(|b| b.title.as_str())
            .collect();
        assert_eq!(annotated, vec!["Don Quixote", "Great Expectations"]);
        assert!(books.iter().all(|b| b.cover.is_none()));
    }

    #[test]
    fn test_sample_books_get_fresh_ids() {
        let a = sample_books(SortOrder::default());
        let b = sample_books(SortOrder::default());
        assert_ne!(a[0].id, b[0].id);
    }
}
