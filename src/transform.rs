use crate::clean::Normalizer;
use crate::date::calendar_date;
use crate::error::EtlError;
use crate::models::{CleanedRecord, CommentRecord};

/// Row counts across the transform step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TransformStats {
    pub input: usize,
    pub kept: usize,
    pub dropped: usize,
}

/// Narrow both dates to calendar days and attach both cleaned text variants.
pub fn clean_record(normalizer: &Normalizer, rec: CommentRecord) -> Result<CleanedRecord, EtlError> {
    let video_date = calendar_date(&rec.video_date)?;
    let comment_date = calendar_date(&rec.comment_date)?;
    let cleaned_text = normalizer.clean_text(&rec.text);
    let cleaned_text_sentiment = normalizer.clean_text_sentiment(&rec.text);
    Ok(CleanedRecord {
        video_title: rec.video_title,
        video_id: rec.video_id,
        video_date,
        text: rec.text,
        comment_date,
        cleaned_text,
        cleaned_text_sentiment,
    })
}

/// Keep only rows whose cleaned fields both carry text.
pub fn drop_empty(rows: Vec<CleanedRecord>) -> Vec<CleanedRecord> {
    rows.into_iter().filter(CleanedRecord::has_content).collect()
}

/// Clean every record in order, then drop empty rows. The first bad record aborts.
pub fn transform(normalizer: &Normalizer, records: Vec<CommentRecord>) -> Result<(Vec<CleanedRecord>, TransformStats), EtlError> {
    let input = records.len();
    let mut cleaned = Vec::with_capacity(input);
    for (idx, rec) in records.into_iter().enumerate() {
        let video_id = rec.video_id.clone();
        let row = clean_record(normalizer, rec).map_err(|e| {
            EtlError::transformation(format!("record {} (video {})", idx, video_id), e)
        })?;
        cleaned.push(row);
    }

    let kept = drop_empty(cleaned);
    let stats = TransformStats { input, kept: kept.len(), dropped: input - kept.len() };
    tracing::info!(input = stats.input, kept = stats.kept, dropped = stats.dropped, "records transformed");
    Ok((kept, stats))
}
