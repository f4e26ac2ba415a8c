use carbonforge_schemas::assessment::Answer;

fn text(answer: &Option<Answer>) -> Option<&str> {
    answer.as_ref().map(Answer::as_str)
}

/// Reads the leading decimal number of an answer, ignoring trailing text
/// such as units or a percent sign. Blank or non-numeric answers are `None`.
pub(super) fn number(answer: &Option<Answer>) -> Option<f64> {
    let value = text(answer)?.trim_start();
    let bytes = value.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }
    let int_start = end;
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    let mut digits = end - int_start;
    if bytes.get(end) == Some(&b'.') {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while bytes.get(frac_end).is_some_and(u8::is_ascii_digit) {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }
    if digits == 0 {
        return None;
    }
    if matches!(bytes.get(end), Some(b'e') | Some(b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+') | Some(b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while bytes.get(exp_end).is_some_and(u8::is_ascii_digit) {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    value[..end].parse().ok()
}

/// `yes`, `y` or `true`, case-insensitive.
pub(super) fn is_yes(answer: &Option<Answer>) -> bool {
    text(answer).is_some_and(|value| {
        matches!(value.trim().to_lowercase().as_str(), "yes" | "y" | "true")
    })
}

/// Whether any of the answers is non-blank.
pub(super) fn has_data(answers: &[&Option<Answer>]) -> bool {
    answers
        .iter()
        .any(|answer| text(answer).is_some_and(|value| !value.trim().is_empty()))
}

pub(super) fn count_yes(answers: &[&Option<Answer>]) -> usize {
    answers.iter().filter(|answer| is_yes(answer)).count()
}

/// Groups thousands and keeps at most three decimals, e.g. `12,345.5`.
pub(super) fn grouped(value: f64) -> String {
    let rounded = (value * 1000.0).round() / 1000.0;
    let formatted = format!("{:.3}", rounded.abs());
    let (whole, fraction) = formatted.split_once('.').unwrap_or((formatted.as_str(), ""));

    let mut out = String::new();
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(digit);
    }
    let fraction = fraction.trim_end_matches('0');
    if !fraction.is_empty() {
        out.push('.');
        out.push_str(fraction);
    }
    if rounded < 0.0 {
        out.insert(0, '-');
    }
    out
}
