/// Hangul syllables, Jamo, compatibility Jamo, Jamo Extended-A and -B.
const HANGUL_RANGES: [(u32, u32); 5] = [
    (0xAC00, 0xD7A3),
    (0x1100, 0x11FF),
    (0x3130, 0x318F),
    (0xA960, 0xA97F),
    (0xD7B0, 0xD7FF),
];

pub fn is_hangul(ch: char) -> bool {
    let code = ch as u32;
    HANGUL_RANGES
        .iter()
        .any(|&(start, end)| (start..=end).contains(&code))
}

/// Count (hangul, total) over the alphanumeric characters of `text`.
pub fn count_hangul(text: &str) -> (usize, usize) {
    text.chars()
        .filter(|c| c.is_alphanumeric())
        .fold((0, 0), |(hangul, total), c| {
            (hangul + usize::from(is_hangul(c)), total + 1)
        })
}

/// Share of Hangul among all alphanumeric characters, in [0, 100].
///
/// Returns 0 when no alphanumeric character is present at all.
pub fn script_ratio<'a, I>(texts: I) -> f64
where
    I: IntoIterator<Item = &'a str>,
{
    let (hangul, total) = texts
        .into_iter()
        .map(count_hangul)
        .fold((0, 0), |(h, t), (dh, dt)| (h + dh, t + dt));

    if total == 0 {
        return 0.0;
    }
    hangul as f64 / total as f64 * 100.0
}
