use proxy_framework::mock::{Call, MockBackingClient};
use proxy_framework::{
    ApiError, BackingListOptions, BackingObject, ConversionError, Converter, CreateOptions,
    DeleteOptions, GetOptions, ListMeta, ListOptions, ObjectList, ObjectMeta, ReplaceObject,
    RequestContext, Requirement, Resource, ResourceProxy, Selector, UpdateOptions,
};

// --- Test Kind ---

#[derive(Debug, Clone, Default, PartialEq)]
struct WidgetStatus {
    phase: String,
    ready: u32,
}

#[derive(Debug, Clone, Default, PartialEq)]
struct BackingWidgetSpec {
    size: u32,
    color: String,
    // Not part of the public shape.
    placement_hint: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
struct BackingWidget {
    metadata: ObjectMeta,
    spec: BackingWidgetSpec,
    status: WidgetStatus,
}

impl Resource for BackingWidget {
    const PLURAL: &'static str = "widgets";

    fn metadata(&self) -> &ObjectMeta {
        &self.metadata
    }

    fn metadata_mut(&mut self) -> &mut ObjectMeta {
        &mut self.metadata
    }
}

impl BackingObject for BackingWidget {
    type SpecView = (ObjectMeta, BackingWidgetSpec);
    type StatusView = WidgetStatus;

    fn into_views(self) -> (Self::SpecView, Self::StatusView) {
        ((self.metadata, self.spec), self.status)
    }

    fn from_views((metadata, spec): Self::SpecView, status: Self::StatusView) -> Self {
        Self {
            metadata,
            spec,
            status,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
struct WidgetSpec {
    size: u32,
    color: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
struct Widget {
    metadata: ObjectMeta,
    spec: WidgetSpec,
    status: WidgetStatus,
}

impl Resource for Widget {
    const PLURAL: &'static str = "widgets";

    fn metadata(&self) -> &ObjectMeta {
        &self.metadata
    }

    fn metadata_mut(&mut self) -> &mut ObjectMeta {
        &mut self.metadata
    }
}

struct WidgetConverter;

impl Converter for WidgetConverter {
    type Public = Widget;
    type Backing = BackingWidget;

    fn to_public(&self, backing: &BackingWidget) -> Result<Widget, ConversionError> {
        if backing.spec.color.is_empty() {
            return Err(ConversionError::new("spec.color", "missing"));
        }
        Ok(Widget {
            metadata: backing.metadata.clone(),
            spec: WidgetSpec {
                size: backing.spec.size,
                color: backing.spec.color.clone(),
            },
            status: backing.status.clone(),
        })
    }

    fn to_backing(&self, public: &Widget, target: &mut BackingWidget) -> Result<(), ConversionError> {
        if public.spec.size == 0 {
            return Err(ConversionError::new("spec.size", "must be positive"));
        }
        target.metadata = public.metadata.clone();
        target.spec.size = public.spec.size;
        target.spec.color = public.spec.color.clone();
        target.status = public.status.clone();
        Ok(())
    }
}

// --- Helpers ---

type WidgetProxy = ResourceProxy<WidgetConverter, MockBackingClient<BackingWidget>>;

fn setup() -> (WidgetProxy, MockBackingClient<BackingWidget>) {
    let mock = MockBackingClient::new();
    (ResourceProxy::new(WidgetConverter, mock.clone()), mock)
}

fn ctx() -> RequestContext {
    RequestContext::with_namespace("team-a")
}

fn backing(name: &str, version: &str, color: &str, phase: &str) -> BackingWidget {
    let mut metadata = ObjectMeta::named("team-a", name);
    metadata.resource_version = version.to_string();
    BackingWidget {
        metadata,
        spec: BackingWidgetSpec {
            size: 1,
            color: color.to_string(),
            placement_hint: "rack-3".to_string(),
        },
        status: WidgetStatus {
            phase: phase.to_string(),
            ready: 1,
        },
    }
}

fn with_version(mut object: BackingWidget, version: &str) -> BackingWidget {
    object.metadata.resource_version = version.to_string();
    object
}

fn not_found(name: &str) -> ApiError {
    ApiError::NotFound {
        resource: "widgets".into(),
        name: name.into(),
    }
}

fn recolor(color: &'static str) -> impl Fn(&Widget) -> Result<Widget, ApiError> {
    move |old: &Widget| {
        let mut new = old.clone();
        new.spec.color = color.to_string();
        Ok(new)
    }
}

fn rephase(phase: &'static str) -> impl Fn(&Widget) -> Result<Widget, ApiError> {
    move |old: &Widget| {
        let mut new = old.clone();
        new.status.phase = phase.to_string();
        Ok(new)
    }
}

// --- Update ---

#[tokio::test]
async fn test_update_identity_transform_issues_no_writes() {
    let (proxy, mock) = setup();
    let live = backing("r1", "1", "red", "Ready");
    mock.expect_get("r1").return_ok(live.clone());

    let identity = |old: &Widget| Ok::<_, ApiError>(old.clone());
    let (widget, created) = proxy
        .update(&ctx(), "r1", &identity, false, &UpdateOptions::default())
        .await
        .unwrap();

    assert!(!created);
    assert_eq!(widget, WidgetConverter.to_public(&live).unwrap());
    assert!(mock.writes().is_empty());
    mock.verify();
}

#[tokio::test]
async fn test_update_spec_only_change_skips_status_write() {
    let (proxy, mock) = setup();
    let live = backing("r1", "1", "A", "X");
    mock.expect_get("r1").return_ok(live.clone());

    // The store echoes the spec write with a new resource version and the stored status.
    let mut stored = with_version(live.clone(), "2");
    stored.spec.color = "B".into();
    mock.expect_update().return_ok(stored);

    let (widget, created) = proxy
        .update(&ctx(), "r1", &recolor("B"), false, &UpdateOptions::default())
        .await
        .unwrap();

    assert!(!created);
    assert_eq!(widget.spec.color, "B");
    assert_eq!(widget.status.phase, "X");
    assert_eq!(widget.metadata.resource_version, "2");

    let writes = mock.writes();
    assert_eq!(writes.len(), 1);
    match &writes[0] {
        Call::Update { namespace, object } => {
            assert_eq!(namespace, "team-a");
            assert_eq!(object.spec.color, "B");
            assert_eq!(object.status, WidgetStatus::default());
            assert_eq!(object.metadata.resource_version, "1");
        }
        other => panic!("expected update, got {other:?}"),
    }
    mock.verify();
}

#[tokio::test]
async fn test_update_status_only_change_skips_spec_write() {
    let (proxy, mock) = setup();
    let live = backing("r1", "1", "red", "Pending");
    mock.expect_get("r1").return_ok(live.clone());

    let mut stored = with_version(live.clone(), "2");
    stored.status.phase = "Ready".into();
    mock.expect_update_status().return_ok(stored);

    let (widget, _) = proxy
        .update(&ctx(), "r1", &rephase("Ready"), false, &UpdateOptions::default())
        .await
        .unwrap();

    assert_eq!(widget.status.phase, "Ready");
    assert_eq!(widget.metadata.resource_version, "2");

    let writes = mock.writes();
    assert_eq!(writes.len(), 1);
    match &writes[0] {
        Call::UpdateStatus { object, .. } => {
            assert_eq!(object.status.phase, "Ready");
            assert_eq!(object.spec, live.spec);
            assert_eq!(object.metadata.resource_version, "1");
        }
        other => panic!("expected update_status, got {other:?}"),
    }
    mock.verify();
}

#[tokio::test]
async fn test_update_both_halves_writes_spec_then_status() {
    let (proxy, mock) = setup();
    let live = backing("r1", "1", "red", "Pending");
    mock.expect_get("r1").return_ok(live.clone());

    let mut after_spec = with_version(live.clone(), "2");
    after_spec.spec.color = "blue".into();
    mock.expect_update().return_ok(after_spec.clone());

    let mut after_status = with_version(after_spec, "3");
    after_status.status.phase = "Ready".into();
    mock.expect_update_status().return_ok(after_status);

    let both = |old: &Widget| {
        let mut new = old.clone();
        new.spec.color = "blue".into();
        new.status.phase = "Ready".into();
        Ok::<_, ApiError>(new)
    };
    let (widget, created) = proxy
        .update(&ctx(), "r1", &both, false, &UpdateOptions::default())
        .await
        .unwrap();

    assert!(!created);
    assert_eq!(widget.spec.color, "blue");
    assert_eq!(widget.status.phase, "Ready");
    assert_eq!(widget.metadata.resource_version, "3");

    let writes = mock.writes();
    assert_eq!(writes.len(), 2);
    assert!(matches!(writes[0], Call::Update { .. }));
    match &writes[1] {
        Call::UpdateStatus { object, .. } => {
            // The status write builds on the spec write's response.
            assert_eq!(object.metadata.resource_version, "2");
            assert_eq!(object.spec.color, "blue");
            assert_eq!(object.status.phase, "Ready");
        }
        other => panic!("expected update_status, got {other:?}"),
    }
    mock.verify();
}

#[tokio::test]
async fn test_update_preserves_backing_only_fields() {
    let (proxy, mock) = setup();
    let live = backing("r1", "1", "red", "Ready");
    mock.expect_get("r1").return_ok(live.clone());
    mock.expect_update().return_ok(with_version(live, "2"));

    proxy
        .update(&ctx(), "r1", &recolor("green"), false, &UpdateOptions::default())
        .await
        .unwrap();

    match &mock.writes()[0] {
        Call::Update { object, .. } => assert_eq!(object.spec.placement_hint, "rack-3"),
        other => panic!("expected update, got {other:?}"),
    }
}

#[tokio::test]
async fn test_update_transform_failure_aborts_before_writes() {
    let (proxy, mock) = setup();
    mock.expect_get("r1").return_ok(backing("r1", "1", "red", "Ready"));

    let refuse = |_: &Widget| -> Result<Widget, ApiError> {
        Err(ApiError::Conflict {
            resource: "widgets".into(),
            name: "r1".into(),
            message: "precondition failed".into(),
        })
    };
    let err = proxy
        .update(&ctx(), "r1", &refuse, false, &UpdateOptions::default())
        .await
        .unwrap_err();

    assert!(err.is_conflict());
    assert!(mock.writes().is_empty());
    mock.verify();
}

#[tokio::test]
async fn test_update_replace_with_stale_version_conflicts() {
    let (proxy, mock) = setup();
    let live = backing("r1", "5", "red", "Ready");
    mock.expect_get("r1").return_ok(live.clone());

    let mut submitted = WidgetConverter.to_public(&live).unwrap();
    submitted.metadata.resource_version = "4".into();
    submitted.spec.color = "blue".into();

    let err = proxy
        .update(
            &ctx(),
            "r1",
            &ReplaceObject::new(submitted),
            false,
            &UpdateOptions::default(),
        )
        .await
        .unwrap_err();

    assert!(err.is_conflict());
    assert!(mock.writes().is_empty());
}

#[tokio::test]
async fn test_update_conversion_failure_aborts_before_writes() {
    let (proxy, mock) = setup();
    mock.expect_get("r1").return_ok(backing("r1", "1", "red", "Ready"));

    let shrink = |old: &Widget| {
        let mut new = old.clone();
        new.spec.size = 0;
        Ok::<_, ApiError>(new)
    };
    let err = proxy
        .update(&ctx(), "r1", &shrink, false, &UpdateOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Conversion(ref e) if e.field == "spec.size"));
    assert!(mock.writes().is_empty());
}

#[tokio::test]
async fn test_update_spec_failure_propagates_and_skips_status() {
    let (proxy, mock) = setup();
    mock.expect_get("r1").return_ok(backing("r1", "1", "red", "Pending"));
    let conflict = ApiError::Conflict {
        resource: "widgets".into(),
        name: "r1".into(),
        message: "resource version 1 is stale".into(),
    };
    mock.expect_update().return_err(conflict.clone());

    let both = |old: &Widget| {
        let mut new = old.clone();
        new.spec.color = "blue".into();
        new.status.phase = "Ready".into();
        Ok::<_, ApiError>(new)
    };
    let err = proxy
        .update(&ctx(), "r1", &both, false, &UpdateOptions::default())
        .await
        .unwrap_err();

    assert_eq!(err, conflict);
    assert_eq!(mock.writes().len(), 1);
    mock.verify();
}

#[tokio::test]
async fn test_update_status_failure_leaves_spec_write_applied() {
    let (proxy, mock) = setup();
    let live = backing("r1", "1", "red", "Pending");
    mock.expect_get("r1").return_ok(live.clone());
    mock.expect_update().return_ok(with_version(live, "2"));
    mock.expect_update_status()
        .return_err(ApiError::Internal("etcd unavailable".into()));

    let both = |old: &Widget| {
        let mut new = old.clone();
        new.spec.color = "blue".into();
        new.status.phase = "Ready".into();
        Ok::<_, ApiError>(new)
    };
    let err = proxy
        .update(&ctx(), "r1", &both, false, &UpdateOptions::default())
        .await
        .unwrap_err();

    assert_eq!(err, ApiError::Internal("etcd unavailable".into()));
    let writes = mock.writes();
    assert!(matches!(writes[0], Call::Update { .. }));
    assert!(matches!(writes[1], Call::UpdateStatus { .. }));
}

#[tokio::test]
async fn test_update_never_creates_missing_objects() {
    let (proxy, mock) = setup();
    mock.expect_get("ghost").return_err(not_found("ghost"));

    let err = proxy
        .update(&ctx(), "ghost", &recolor("red"), true, &UpdateOptions::default())
        .await
        .unwrap_err();

    assert_eq!(err, not_found("ghost"));
    assert!(mock.writes().is_empty());
    mock.verify();
}

// --- Namespace ---

#[tokio::test]
async fn test_missing_namespace_is_rejected_before_backing_calls() {
    let (proxy, mock) = setup();
    let no_ns = RequestContext::new();
    let widget = WidgetConverter.to_public(&backing("r1", "", "red", "")).unwrap();

    let results = [
        proxy.list(&no_ns, &ListOptions::default()).await.map(|_| ()),
        proxy.get(&no_ns, "r1", &GetOptions::default()).await.map(|_| ()),
        proxy
            .create(&no_ns, &widget, &CreateOptions::default())
            .await
            .map(|_| ()),
        proxy
            .update(&no_ns, "r1", &recolor("blue"), false, &UpdateOptions::default())
            .await
            .map(|_| ()),
        proxy
            .delete(&no_ns, "r1", &DeleteOptions::default())
            .await
            .map(|_| ()),
    ];

    for result in results {
        assert_eq!(
            result,
            Err(ApiError::BadRequest("namespace parameter required".into()))
        );
    }
    assert!(mock.calls().is_empty());
}

// --- Get / Create / Delete ---

#[tokio::test]
async fn test_get_converts_and_propagates_not_found() {
    let (proxy, mock) = setup();
    mock.expect_get("r1").return_ok(backing("r1", "3", "red", "Ready"));
    mock.expect_get("r2").return_err(not_found("r2"));

    let widget = proxy.get(&ctx(), "r1", &GetOptions::default()).await.unwrap();
    assert_eq!(widget.spec.color, "red");
    assert_eq!(widget.metadata.resource_version, "3");

    let err = proxy.get(&ctx(), "r2", &GetOptions::default()).await.unwrap_err();
    assert_eq!(err, not_found("r2"));
    mock.verify();
}

#[tokio::test]
async fn test_create_round_trips_through_backing_shape() {
    let (proxy, mock) = setup();
    let mut stored = backing("r1", "1", "red", "");
    stored.spec.placement_hint.clear();
    stored.status = WidgetStatus::default();
    mock.expect_create().return_ok(stored.clone());

    let mut submitted = WidgetConverter.to_public(&stored).unwrap();
    submitted.metadata.resource_version.clear();

    let created = proxy
        .create(&ctx(), &submitted, &CreateOptions::default())
        .await
        .unwrap();
    assert_eq!(created.metadata.resource_version, "1");

    match &mock.writes()[0] {
        Call::Create { namespace, object } => {
            assert_eq!(namespace, "team-a");
            assert_eq!(object.spec.color, "red");
        }
        other => panic!("expected create, got {other:?}"),
    }
    mock.verify();
}

#[tokio::test]
async fn test_create_propagates_already_exists() {
    let (proxy, mock) = setup();
    let exists = ApiError::AlreadyExists {
        resource: "widgets".into(),
        name: "r1".into(),
    };
    mock.expect_create().return_err(exists.clone());

    let widget = WidgetConverter.to_public(&backing("r1", "", "red", "")).unwrap();
    let err = proxy
        .create(&ctx(), &widget, &CreateOptions::default())
        .await
        .unwrap_err();
    assert_eq!(err, exists);
}

#[tokio::test]
async fn test_create_conversion_failure_skips_backing_write() {
    let (proxy, mock) = setup();
    let mut widget = WidgetConverter.to_public(&backing("r1", "", "red", "")).unwrap();
    widget.spec.size = 0;

    let err = proxy
        .create(&ctx(), &widget, &CreateOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Conversion(_)));
    assert!(mock.calls().is_empty());
}

#[tokio::test]
async fn test_delete_reports_immediate_success_and_forwards_options() {
    let (proxy, mock) = setup();
    mock.expect_delete("r1").return_ok(());

    let options = DeleteOptions {
        grace_period_seconds: Some(30),
        ..Default::default()
    };
    let (status, immediate) = proxy.delete(&ctx(), "r1", &options).await.unwrap();

    assert!(immediate);
    assert!(status.is_success());
    assert_eq!(
        mock.calls(),
        vec![Call::Delete {
            namespace: "team-a".into(),
            name: "r1".into(),
            options,
        }]
    );
}

#[tokio::test]
async fn test_delete_propagates_not_found_unchanged() {
    let (proxy, mock) = setup();
    mock.expect_delete("r1").return_err(not_found("r1"));

    let err = proxy
        .delete(&ctx(), "r1", &DeleteOptions::default())
        .await
        .unwrap_err();
    assert_eq!(err, not_found("r1"));
    mock.verify();
}

// --- List ---

#[tokio::test]
async fn test_list_converts_items_and_keeps_list_metadata() {
    let (proxy, mock) = setup();
    let metadata = ListMeta {
        resource_version: "42".into(),
        continue_token: "r2".into(),
        remaining_item_count: Some(3),
    };
    mock.expect_list().return_ok(ObjectList::new(
        metadata.clone(),
        vec![backing("r1", "1", "red", ""), backing("r2", "2", "blue", "")],
    ));

    let options = ListOptions {
        label_selector: Some(Selector::everything().and(Requirement::equals("env", "prod"))),
        limit: Some(2),
        ..Default::default()
    };
    let list = proxy.list(&ctx(), &options).await.unwrap();

    assert_eq!(list.metadata, metadata);
    let colors: Vec<_> = list.items.iter().map(|w| w.spec.color.as_str()).collect();
    assert_eq!(colors, ["red", "blue"]);
    assert_eq!(
        mock.calls(),
        vec![Call::List {
            namespace: "team-a".into(),
            options: BackingListOptions {
                label_selector: "env=prod".into(),
                limit: 2,
                ..Default::default()
            },
        }]
    );
}

#[tokio::test]
async fn test_list_fails_fast_on_unconvertible_item() {
    let (proxy, mock) = setup();
    mock.expect_list().return_ok(ObjectList::new(
        ListMeta::default(),
        vec![backing("r1", "1", "red", ""), backing("r2", "2", "", "")],
    ));

    let err = proxy
        .list(&ctx(), &ListOptions::default())
        .await
        .unwrap_err();
    assert_eq!(err, ApiError::from(ConversionError::new("spec.color", "missing")));
}

#[tokio::test]
async fn test_list_option_translation_failure_skips_backing_call() {
    let (proxy, mock) = setup();
    let options = ListOptions {
        label_selector: Some(Selector::everything().and(Requirement::exists(""))),
        ..Default::default()
    };

    let err = proxy.list(&ctx(), &options).await.unwrap_err();
    assert!(matches!(err, ApiError::Conversion(_)));
    assert!(mock.calls().is_empty());
}

#[test]
fn test_proxy_scope_and_constructors() {
    let (proxy, _mock) = setup();
    assert!(proxy.namespace_scoped());
    assert_eq!(proxy.new_object(), Widget::default());
    assert!(proxy.new_list().is_empty());
}
