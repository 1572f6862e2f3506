use std::fmt::Formatter;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct A1Notation(pub String);

impl std::fmt::Display for A1Notation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<A1Notation> for String {
    fn from(a1_notation: A1Notation) -> Self {
        a1_notation.0
    }
}

impl AsRef<str> for A1Notation {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

pub trait ToA1Notation {
    fn to_a1_notation(&self, sheet_title: Option<&str>) -> A1Notation;
}

/// Quotes a sheet title for use in a range, doubling embedded single quotes.
pub fn quote_sheet_title(title: &str) -> String {
    format!("'{}'", title.replace('\'', "''"))
}

/// The range covering a whole worksheet, e.g. `'Sales Q1'`.
pub fn whole_sheet(title: &str) -> A1Notation {
    A1Notation(quote_sheet_title(title))
}

/// 1-based column number to its letters (`1` -> `A`, `27` -> `AA`).
pub fn number_to_letters(number: u32) -> String {
    let mut number = number.max(1);
    let mut result = String::new();
    while number > 0 {
        let remainder = (number - 1) % 26;
        let letter = (remainder as u8 + b'A') as char;
        result.push(letter);
        number = (number - remainder) / 26;
    }
    result.chars().rev().collect()
}

/// A block anchored at `A1` spanning `row_count` rows and `column_count` columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnchoredBlock {
    pub row_count: u32,
    pub column_count: u32,
}

impl ToA1Notation for AnchoredBlock {
    fn to_a1_notation(&self, sheet_title: Option<&str>) -> A1Notation {
        let local = format!(
            "A1:{}{}",
            number_to_letters(self.column_count),
            self.row_count.max(1)
        );
        match sheet_title {
            Some(title) => A1Notation(format!("{}!{}", quote_sheet_title(title), local)),
            None => A1Notation(local),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_to_letters() {
        assert_eq!(number_to_letters(1), "A");
        assert_eq!(number_to_letters(26), "Z");
        assert_eq!(number_to_letters(27), "AA");
        assert_eq!(number_to_letters(28), "AB");
        assert_eq!(number_to_letters(52), "AZ");
        assert_eq!(number_to_letters(53), "BA");
        assert_eq!(number_to_letters(702), "ZZ");
        assert_eq!(number_to_letters(703), "AAA");
    }

    #[test]
    fn test_quote_sheet_title() {
        assert_eq!(quote_sheet_title("Sheet1"), "'Sheet1'");
        assert_eq!(quote_sheet_title("Bob's data"), "'Bob''s data'");
    }

    #[test]
    fn test_anchored_block_to_a1_notation() {
        let block = AnchoredBlock {
            row_count: 10,
            column_count: 3,
        };
        assert_eq!(block.to_a1_notation(None).as_ref(), "A1:C10");
        assert_eq!(
            block.to_a1_notation(Some("Data")).to_string(),
            "'Data'!A1:C10"
        );
    }

    #[test]
    fn test_whole_sheet() {
        assert_eq!(whole_sheet("My Sheet").as_ref(), "'My Sheet'");
    }
}
