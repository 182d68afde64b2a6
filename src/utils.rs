use chrono::NaiveDate;

pub fn format_visit_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn mask_phone(phone: &str) -> String {
    let digits: Vec<char> = phone.chars().collect();
    if digits.len() <= 4 {
        return "*".repeat(digits.len());
    }
    let visible: String = digits[digits.len() - 4..].iter().collect();
    format!("{}{}", "*".repeat(digits.len() - 4), visible)
}
