//! Most-liked-reviews ordering.

use crate::models::Review;

#[derive(Debug, Clone, PartialEq)]
pub struct RankedReview {
    pub review: Review,
    pub likes: u64,
}

/// Orders reviews by like count, most liked first.
///
/// Equal counts put the newer review first; equal timestamps fall back to
/// the slug so the order is total.
pub fn rank_by_likes<I>(reviews: I) -> Vec<RankedReview>
where
    I: IntoIterator<Item = (Review, u64)>,
{
    let mut ranked: Vec<RankedReview> =
        reviews.into_iter().map(|(review, likes)| RankedReview { review, likes }).collect();
    ranked.sort_by(|a, b| {
        b.likes
            .cmp(&a.likes)
            .then_with(|| b.review.created_at.cmp(&a.review.created_at))
            .then_with(|| a.review.slug.cmp(&b.review.slug))
    });
    ranked
}
