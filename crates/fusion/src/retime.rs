use subburn_transcript::RawSegment;

/// Give re-split sentence strings timing proportional to their length.
///
/// `segments` supply the overall span and the reference text; each sentence
/// claims the share of that span its characters occupy in the space-joined
/// text. Resulting segments carry no words.
pub fn retime(segments: &[RawSegment], sentences: &[String]) -> Vec<RawSegment> {
    let spoken: Vec<&RawSegment> = segments
        .iter()
        .filter(|s| !s.text.trim().is_empty())
        .collect();
    let (Some(first), Some(last)) = (spoken.first(), spoken.last()) else {
        return segments.to_vec();
    };
    if sentences.iter().all(|s| s.trim().is_empty()) {
        return segments.to_vec();
    }

    let total_start = first.start.unwrap_or(0.0);
    let total_end = last.end.unwrap_or(0.0);
    let total_duration = total_end - total_start;
    let total_chars: usize = spoken
        .iter()
        .map(|s| s.text.trim().chars().count())
        .sum::<usize>()
        + spoken.len().saturating_sub(1);

    let mut retimed = Vec::with_capacity(sentences.len());
    let mut position = 0usize;
    for (i, sentence) in sentences.iter().enumerate() {
        let sentence = sentence.trim();
        if sentence.is_empty() {
            continue;
        }
        let chars = sentence.chars().count();

        let (from, to) = if total_chars > 0 {
            (
                position as f64 / total_chars as f64,
                (position + chars) as f64 / total_chars as f64,
            )
        } else {
            let n = sentences.len() as f64;
            (i as f64 / n, (i + 1) as f64 / n)
        };

        let start = total_start + total_duration * from;
        let end = (total_start + total_duration * to).min(total_end);
        retimed.push(RawSegment::new(sentence, start, end));

        position += chars + 1;
    }

    tracing::debug!(
        from_segments = segments.len(),
        to_sentences = retimed.len(),
        "retimed_sentences"
    );
    retimed
}
