//! Common regex patterns for vendor invoice extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Invoice number: "Invoice #", "Invoice Number", "INVOICE NO." or bare "Invoice".
    // The token must contain a digit so "Invoice Date" is not read as a number.
    pub static ref INVOICE_NUMBER: Regex = Regex::new(
        r"(?i)\binvoice\s*(?:number|no\.?|#)?\s*:?\s*([A-Z0-9\-]*[0-9][A-Z0-9\-]*)"
    ).unwrap();

    // Invoice date: "Date" or "Invoice Date" followed by D/M/Y with / or - separators.
    pub static ref INVOICE_DATE: Regex = Regex::new(
        r"(?i)(?:invoice\s*date|date)\s*:?\s*(\d{1,2}[/\-]\d{1,2}[/\-]\d{2,4})"
    ).unwrap();

    // Already-ISO date anywhere in a value.
    pub static ref ISO_DATE: Regex = Regex::new(
        r"([0-9]{4}-[0-9]{2}-[0-9]{2})"
    ).unwrap();

    // Size text cleanup: keep digits, dots, whitespace and unit letters.
    pub static ref SIZE_NOISE: Regex = Regex::new(
        r"[^0-9.\sLMKGT]"
    ).unwrap();

    pub static ref SIZE_MILLILITERS: Regex = Regex::new(
        r"([0-9]+(?:\.[0-9]+)?)\s*ML"
    ).unwrap();

    pub static ref SIZE_LITERS: Regex = Regex::new(
        r"([0-9]+(?:\.[0-9]+)?)\s*L"
    ).unwrap();

    pub static ref SIZE_NUMBER: Regex = Regex::new(
        r"([0-9]+(?:\.[0-9]+)?)"
    ).unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invoice_number_labels() {
        let cases = [
            ("Invoice # INV-1001", "INV-1001"),
            ("Invoice Number: 55321", "55321"),
            ("INVOICE NO. A-77", "A-77"),
            ("invoice: 2024-0042", "2024-0042"),
        ];
        for (text, expected) in cases {
            let caps = INVOICE_NUMBER.captures(text).unwrap();
            assert_eq!(&caps[1], expected, "input: {text}");
        }
    }

    #[test]
    fn test_invoice_number_skips_date_label() {
        let text = "Invoice Date: 03/15/2024\nInvoice #: INV-9";
        let caps = INVOICE_NUMBER.captures(text).unwrap();
        assert_eq!(&caps[1], "INV-9");
    }

    #[test]
    fn test_invoice_date() {
        let caps = INVOICE_DATE.captures("Invoice Date: 3/15/24").unwrap();
        assert_eq!(&caps[1], "3/15/24");

        let caps = INVOICE_DATE.captures("DATE 15-03-2024").unwrap();
        assert_eq!(&caps[1], "15-03-2024");

        assert!(INVOICE_DATE.captures("Due: 2024.03.15").is_none());
    }
}
