use domain::Entry;

/// Receives every group a scan dispatches. Whatever it does with the group (start a match,
/// notify players) has no effect on the scan.
pub trait GroupResolver<P>: Send + Sync {
    fn resolve(
        &self,
        group: Vec<Entry<P>>,
    );
}

impl<P, F> GroupResolver<P> for F
where
    F: Fn(Vec<Entry<P>>) + Send + Sync,
{
    fn resolve(
        &self,
        group: Vec<Entry<P>>,
    ) {
        self(group);
    }
}
