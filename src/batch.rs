use crate::error::KiraError;

#[derive(Debug, Clone)]
pub struct Batched<I> {
    inner: I,
    size: usize,
}

pub fn batched<I>(items: I, size: usize) -> Result<Batched<I::IntoIter>, KiraError>
where
    I: IntoIterator,
{
    if size < 1 {
        return Err(KiraError::InvalidBatchSize(size));
    }
    Ok(Batched {
        inner: items.into_iter(),
        size,
    })
}

impl<I: Iterator> Iterator for Batched<I> {
    type Item = Vec<I::Item>;

    fn next(&mut self) -> Option<Self::Item> {
        let group = self.inner.by_ref().take(self.size).collect::<Vec<_>>();
        (!group.is_empty()).then_some(group)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let (lower, upper) = self.inner.size_hint();
        (
            lower.div_ceil(self.size),
            upper.map(|upper| upper.div_ceil(self.size)),
        )
    }
}
