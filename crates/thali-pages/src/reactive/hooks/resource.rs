//! Resource hook: use_resource

use core::fmt::Debug;
use core::future::Future;

use thali_core::Scope;

use crate::error::FetchError;
use crate::resource::Resource;

/// Subscribes the calling component to one async resource.
///
/// Creates a [`Resource`], subscribes it to `key` and tears it down when the
/// scope is disposed, so a response arriving after unmount never changes
/// state. Point the returned handle at another key with
/// [`Resource::subscribe`].
///
/// # Arguments
///
/// * `scope` - The scope of the calling component
/// * `key` - What to fetch first
/// * `fetcher` - Produces the request for a key
///
/// # Example
///
/// ```ignore
/// use thali_pages::reactive::hooks::use_resource;
///
/// let detail = use_resource(scope, id, move |id: EntityId| {
///     let catalog = catalog.clone();
///     async move { fetch_detail(&*catalog, &id).await }
/// });
/// ```
pub fn use_resource<K, T, F, Fut>(scope: &Scope, key: K, fetcher: F) -> Resource<K, T>
where
	K: Clone + PartialEq + Debug + 'static,
	T: 'static,
	F: Fn(K) -> Fut + 'static,
	Fut: Future<Output = Result<T, FetchError>> + 'static,
{
	let resource = Resource::new(fetcher);
	bind(scope, &resource);
	resource.subscribe(key);
	resource
}

/// Tie an existing resource's teardown to `scope`
pub(crate) fn bind<K, T>(scope: &Scope, resource: &Resource<K, T>)
where
	K: Clone + PartialEq + Debug + 'static,
	T: 'static,
{
	let resource = resource.clone();
	scope.on_cleanup(move || resource.teardown());
}
