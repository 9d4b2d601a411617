use std::sync::Arc;

use serde::{Deserialize, Serialize};

use searchable::{
    DocumentSchema, Engine, EngineConfig, IndexStatus, MemoryClient, Result, SearchClient,
    SearchError, Searchable,
};

const STYLE_A: i32 = 1;
const STYLE_B: i32 = 2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Tweet {
    id: String,
    name: String,
    style: i32,
    gender: bool,
    via: String,
    content: String,
    created_at: i64,
}

impl Tweet {
    fn new(id: &str, name: &str, style: i32, gender: bool, via: &str, content: &str) -> Self {
        Tweet {
            id: id.to_string(),
            name: name.to_string(),
            style,
            gender,
            via: via.to_string(),
            content: content.to_string(),
            created_at: 1_486_000_000_000,
        }
    }
}

impl Searchable for Tweet {
    fn schema() -> DocumentSchema {
        DocumentSchema::new("tweet")
            .id::<String>("id")
            .field::<String>("name")
            .field::<i32>("style")
            .field::<bool>("gender")
            .keyword::<String>("via")
            .field::<String>("content")
            .field::<i64>("created_at")
    }
}

async fn setup(config: EngineConfig) -> Result<(Arc<MemoryClient>, Engine)> {
    let client = Arc::new(MemoryClient::new(config.index.clone()));
    let engine = Engine::new(client.clone(), config)?;
    engine.register::<Tweet>()?;
    engine.init().await?;
    Ok((client, engine))
}

async fn index_samples(engine: &Engine) -> Result<()> {
    let authors = [
        "Michael Liao",
        "Bob Lee",
        "小明 & Trump",
        "小小明",
        "张sir",
        "李sir",
        "老王",
        "八神庵",
        "くさなぎ きょう",
        "不知火舞",
    ];
    let contents = [
        "特朗普Trump上任后美或加入亚投行",
        "普京与特朗普电话会谈，称应联合打击恐怖主义",
        "厉害了：支持特朗普的创业者被从YC孵化器开除",
        "强推自家防毒软件，微软把卡巴斯基惹毛了",
        "神突破！Google发布神经网络机器翻译系统：支持中英",
        "Dive into the details of optimizing your cluster with the Elastic Cloud documentation.",
        "帅呆了！微软即将发布 Visual Studio for Mac 预览版",
        "Obama: Give Trump a chance",
        "Google自己做手机，三星开始给自家系统拉应用",
        "MIT开发新系统，让初学者也能处理复杂软件",
    ];
    for (i, (author, content)) in authors.iter().zip(contents.iter()).enumerate() {
        let even = i % 2 == 0;
        let tweet = Tweet::new(
            &format!("id-{i}"),
            author,
            if even { STYLE_A } else { STYLE_B },
            even,
            if even { "iPhone 7 Plus" } else { "网页" },
            content,
        );
        engine.index(&tweet).await?;
    }
    Ok(())
}

fn ids(results: &[Tweet]) -> Vec<&str> {
    results.iter().map(|t| t.id.as_str()).collect()
}

#[tokio::test]
async fn test_init_is_idempotent() -> Result<()> {
    let (client, engine) = setup(EngineConfig::default()).await?;
    let report = engine.init().await?;
    assert_eq!(report.index, IndexStatus::AlreadyExisted);
    assert_eq!(
        report.schemas,
        vec![("tweet".to_string(), IndexStatus::AlreadyExisted)]
    );
    assert_eq!(client.ensure_index_exists().await?, IndexStatus::AlreadyExisted);
    Ok(())
}

#[tokio::test]
async fn test_crud_doc() -> Result<()> {
    let (_client, engine) = setup(EngineConfig::default()).await?;

    let t1 = Tweet::new(
        "a-12345",
        "Michael Liao",
        STYLE_A,
        true,
        "iPhone 7 Plus",
        "好消息，Java SE基础课程正式发布了！去www.liaoxuefeng.com看看。",
    );
    engine.index(&t1).await?;
    let t2 = engine.get::<Tweet>("a-12345").await?.unwrap();
    assert_eq!(t2, t1);

    // same id replaces the document
    let t3 = Tweet::new(
        "a-12345",
        "Bob Lee",
        STYLE_B,
        false,
        "iPad mini",
        "好消息，Java EE课程正式发布了！去www.github.com看看。",
    );
    engine.index(&t3).await?;
    let t4 = engine.get::<Tweet>("a-12345").await?.unwrap();
    assert_eq!(t4.name, "Bob Lee");
    assert_eq!(t4.style, STYLE_B);
    assert!(!t4.gender);
    assert!(t4.content.contains("Java EE"));

    assert!(engine.unindex_by_id::<Tweet>("a-12345").await?);
    assert!(engine.get::<Tweet>("a-12345").await?.is_none());
    assert!(!engine.unindex(&t4).await?);
    Ok(())
}

#[tokio::test]
async fn test_search() -> Result<()> {
    let (_client, engine) = setup(EngineConfig::default()).await?;
    index_samples(&engine).await?;

    let sr1 = engine.search::<Tweet>("trump").await?;
    assert_eq!(sr1.total_hits, 3);
    assert_eq!(ids(&sr1.results), vec!["id-0", "id-2", "id-7"]);

    let sr2 = engine.search::<Tweet>("微软").await?;
    assert_eq!(sr2.total_hits, 2);
    assert_eq!(ids(&sr2.results), vec!["id-3", "id-6"]);

    let sr3 = engine.search::<Tweet>("trump特朗普").await?;
    assert_eq!(sr3.total_hits, 4);
    // documents matching both clauses rank first
    assert_eq!(ids(&sr3.results), vec!["id-0", "id-2", "id-1", "id-7"]);

    let sr4 = engine.search::<Tweet>("普京与特朗普").await?;
    assert_eq!(sr4.total_hits, 1);
    assert_eq!(ids(&sr4.results), vec!["id-1"]);
    Ok(())
}

#[tokio::test]
async fn test_search_kana_word() -> Result<()> {
    let (_client, engine) = setup(EngineConfig::default()).await?;
    index_samples(&engine).await?;

    let results = engine.search::<Tweet>("くさなぎ").await?;
    assert_eq!(results.total_hits, 1);
    assert_eq!(ids(&results.results), vec!["id-8"]);
    Ok(())
}

#[tokio::test]
async fn test_search_without_spans_returns_nothing() -> Result<()> {
    let (_client, engine) = setup(EngineConfig::default()).await?;
    index_samples(&engine).await?;

    let results = engine.search::<Tweet>(" ，。！ ").await?;
    assert_eq!(results.total_hits, 0);
    assert!(results.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_min_score_cuts_results_but_not_total() -> Result<()> {
    let (_client, engine) = setup(EngineConfig::default()).await?;
    index_samples(&engine).await?;

    let results = engine.search_with_min_score::<Tweet>("trump特朗普", 1.5).await?;
    assert_eq!(results.total_hits, 4);
    assert_eq!(ids(&results.results), vec!["id-0", "id-2"]);

    let results = engine.search_with_min_score::<Tweet>("trump特朗普", 10.0).await?;
    assert_eq!(results.total_hits, 4);
    assert!(results.is_empty());

    let err = engine
        .search_with_min_score::<Tweet>("trump", f32::NAN)
        .await
        .unwrap_err();
    assert!(matches!(err, SearchError::InvalidArgument(_)));
    Ok(())
}

#[tokio::test]
async fn test_max_results_limits_hits() -> Result<()> {
    let config = EngineConfig::builder()
        .index("testidx")
        .max_results(2)
        .build()?;
    let (_client, engine) = setup(config).await?;
    index_samples(&engine).await?;

    let results = engine.search::<Tweet>("trump").await?;
    assert_eq!(results.total_hits, 3);
    assert_eq!(results.len(), 2);
    Ok(())
}

#[tokio::test]
async fn test_configured_index_reaches_client() -> Result<()> {
    let config = EngineConfig::builder().index("products").build()?;
    let mismatched = Engine::new(Arc::new(MemoryClient::default()), config.clone());
    assert!(matches!(mismatched, Err(SearchError::InvalidConfig(_))));

    let (client, engine) = setup(config).await?;
    assert_eq!(client.index_name(), "products");
    assert_eq!(engine.client().index_name(), "products");
    Ok(())
}

#[tokio::test]
async fn test_client_errors_surface_unchanged() -> Result<()> {
    let client = Arc::new(MemoryClient::default());
    let engine = Engine::new(client.clone(), EngineConfig::default())?;
    engine.register::<Tweet>()?;

    // index was never created
    let err = engine.search::<Tweet>("trump").await.unwrap_err();
    assert!(matches!(err, SearchError::IndexNotFound(_)));

    engine.create_index().await?;
    let err = engine.get::<Tweet>("id-0").await;
    assert!(matches!(err, Ok(None)));
    let tweet = Tweet::new("id-0", "a", STYLE_A, true, "b", "c");
    let err = engine.index(&tweet).await.unwrap_err();
    assert!(matches!(err, SearchError::SchemaNotFound(ref t) if t == "tweet"));

    assert_eq!(engine.create_schema::<Tweet>().await?, IndexStatus::Created);
    engine.index(&tweet).await?;

    client.close();
    let err = engine.get::<Tweet>("id-0").await.unwrap_err();
    assert!(matches!(err, SearchError::EngineUnavailable(_)));
    Ok(())
}

#[tokio::test]
async fn test_engine_is_shareable_across_tasks() -> Result<()> {
    let (_client, engine) = setup(EngineConfig::default()).await?;
    index_samples(&engine).await?;
    let engine = Arc::new(engine);

    let mut handles = Vec::new();
    for query in ["trump", "微软", "trump特朗普", "普京与特朗普"] {
        let engine = engine.clone();
        handles.push(tokio::spawn(async move {
            engine.search::<Tweet>(query).await.map(|r| r.total_hits)
        }));
    }

    let mut totals = Vec::new();
    for handle in handles {
        totals.push(handle.await.expect("search task panicked")?);
    }
    assert_eq!(totals, vec![3, 2, 4, 1]);
    Ok(())
}
