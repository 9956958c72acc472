//! Request generation

use crate::error::Result;
use crate::identity::{random_identity, Identity};
use crate::target::Target;
use cmpbench_http::GeneratedRequest;
use rand::Rng;
use std::sync::Arc;

/// Builds randomized request batches from a shared, read-only identity set
#[derive(Debug, Clone)]
pub struct RequestGenerator {
    identities: Arc<[Identity]>,
}

impl RequestGenerator {
    pub fn new(identities: impl Into<Arc<[Identity]>>) -> Self {
        Self {
            identities: identities.into(),
        }
    }

    /// One request with a random pagination bucket and a random identity
    pub fn build_request<R: Rng>(
        &self,
        target: &Target,
        rng: &mut R,
    ) -> Result<GeneratedRequest> {
        let pagination = target.pagination();
        let bucket = rng.random_range(0..pagination.buckets());

        let mut url = target.endpoint();
        url.query_pairs_mut()
            .extend_pairs(pagination.query_pairs(bucket));

        let identity = random_identity(&self.identities, rng)?;
        Ok(GeneratedRequest::get(url).with_identity(identity)?)
    }

    /// `count` independent requests for `target`
    pub fn build_batch<R: Rng>(
        &self,
        target: &Target,
        count: usize,
        rng: &mut R,
    ) -> Result<Vec<GeneratedRequest>> {
        (0..count).map(|_| self.build_request(target, rng)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BenchError;
    use crate::target::Pagination;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn items_target(pagination: Pagination) -> Target {
        Target::new("items", "http://localhost:3001", "/items", pagination).unwrap()
    }

    #[test]
    fn test_batch_offsets_and_identities() {
        let generator = RequestGenerator::new(vec![Identity(1), Identity(2), Identity(3)]);
        let target = items_target(Pagination::default());
        let mut rng = StdRng::seed_from_u64(42);

        let batch = generator.build_batch(&target, 5, &mut rng).unwrap();
        assert_eq!(batch.len(), 5);

        let allowed_offsets: HashSet<String> = (0..10).map(|b| (b * 10).to_string()).collect();
        for request in &batch {
            assert_eq!(request.url().path(), "/items");
            assert!(["1", "2", "3"].contains(&request.identity().unwrap()));
            assert_eq!(request.query_param("limit").as_deref(), Some("10"));
            assert!(allowed_offsets.contains(&request.query_param("offset").unwrap()));
        }
    }

    #[test]
    fn test_offsets_cover_every_bucket() {
        let generator = RequestGenerator::new(vec![Identity(1)]);
        let target = items_target(Pagination::default());
        let mut rng = StdRng::seed_from_u64(3);

        let offsets: HashSet<String> = generator
            .build_batch(&target, 500, &mut rng)
            .unwrap()
            .iter()
            .map(|r| r.query_param("offset").unwrap())
            .collect();

        assert_eq!(offsets.len(), 10);
    }

    #[test]
    fn test_page_pagination() {
        let generator = RequestGenerator::new(vec![Identity(5)]);
        let target = items_target(Pagination::Page { buckets: 10 });
        let mut rng = StdRng::seed_from_u64(9);

        for request in generator.build_batch(&target, 20, &mut rng).unwrap() {
            let page: u32 = request.query_param("page").unwrap().parse().unwrap();
            assert!(page < 10);
            assert_eq!(request.query_param("offset"), None);
            assert_eq!(request.identity(), Some("5"));
        }
    }

    #[test]
    fn test_seeded_batches_are_reproducible() {
        let generator = RequestGenerator::new(vec![Identity(1), Identity(2), Identity(3)]);
        let target = items_target(Pagination::default());

        let urls = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            generator
                .build_batch(&target, 20, &mut rng)
                .unwrap()
                .iter()
                .map(|r| (r.url().to_string(), r.identity().unwrap().to_string()))
                .collect::<Vec<_>>()
        };

        assert_eq!(urls(11), urls(11));
    }

    #[test]
    fn test_empty_batch_and_empty_identities() {
        let generator = RequestGenerator::new(Vec::<Identity>::new());
        let target = items_target(Pagination::default());
        let mut rng = StdRng::seed_from_u64(0);

        assert!(generator.build_batch(&target, 0, &mut rng).unwrap().is_empty());
        assert!(matches!(
            generator.build_batch(&target, 1, &mut rng),
            Err(BenchError::NoIdentities)
        ));
    }
}
