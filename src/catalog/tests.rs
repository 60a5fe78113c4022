use std::collections::HashSet;

use mongodb::bson::oid::ObjectId;

use crate::{
    model::{Id, Movie, NewMovie, NewPerson, Person},
    prelude::*,
    store::Store,
};
use super::{
    err::ErrorKind, find, find_by_ids, insert, remove, CatalogConfig, MovieQuery, PersonQuery,
};


fn new_movie(title: &str, release_date: &str) -> NewMovie {
    NewMovie {
        title: Some(title.into()),
        release_date: Some(release_date.into()),
        ..NewMovie::default()
    }
}

fn new_person(first_name: &str, last_name: &str) -> NewPerson {
    NewPerson {
        first_name: Some(first_name.into()),
        last_name: Some(last_name.into()),
        ..NewPerson::default()
    }
}

fn remove_all() -> CatalogConfig {
    CatalogConfig { remove_all_without_ids: true }
}

async fn all_movies(store: &Store) -> Result<Vec<Movie>> {
    Ok(find::<Movie>(store, &MovieQuery::default()).await?)
}

fn titles(movies: &[Movie]) -> HashSet<&str> {
    movies.iter().map(|m| m.title.as_str()).collect()
}


#[tokio::test(flavor = "multi_thread")]
async fn insert_then_find_returns_inserted_set() -> Result<()> {
    let store = Store::in_memory();
    let msg = insert::<Movie>(&store, &[
        new_movie("Alien", "1979-05-25"),
        new_movie("Heat", "1995-12-15"),
        new_movie("Up", "2009-05-29"),
    ]).await?;
    assert_eq!(msg, "Added movies: Alien, Heat, Up");

    let movies = all_movies(&store).await?;
    assert_eq!(movies.len(), 3);
    assert_eq!(titles(&movies), HashSet::from(["Alien", "Heat", "Up"]));

    // Generated IDs are all distinct.
    let ids = movies.iter().map(|m| m.id).collect::<HashSet<_>>();
    assert_eq!(ids.len(), 3);

    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn insert_single_and_find_by_title() -> Result<()> {
    let store = Store::in_memory();
    let msg = insert::<Movie>(&store, &[new_movie("X", "2023-01-01")]).await?;
    assert_eq!(msg, "Added movies: X");

    let query = MovieQuery { title: Some("X".into()), ..MovieQuery::default() };
    let found = find::<Movie>(&store, &query).await?;
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].title, "X");
    assert_eq!(found[0].release_date.as_str(), "2023-01-01");
    assert_eq!(found[0].director_id, None);
    assert_eq!(found[0].actor_ids, None);

    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn caller_assigned_ids_are_kept() -> Result<()> {
    let store = Store::in_memory();
    let id = ObjectId::new();
    let draft = NewPerson { id: Some(id.into()), ..new_person("Sigourney", "Weaver") };
    let msg = insert::<Person>(&store, &[draft, new_person("Al", "Pacino")]).await?;
    assert_eq!(msg, "Added people: Sigourney Weaver, Al Pacino");

    let query = PersonQuery { id: Some(id.into()), ..PersonQuery::default() };
    let found = find::<Person>(&store, &query).await?;
    assert_eq!(found, vec![Person {
        id,
        first_name: "Sigourney".into(),
        last_name: "Weaver".into(),
    }]);

    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn find_combines_arguments_with_or() -> Result<()> {
    let store = Store::in_memory();
    insert::<Movie>(&store, &[
        new_movie("A", "2000-01-01"),
        new_movie("B", "2010-10-10"),
        new_movie("C", "2020-02-02"),
    ]).await?;

    let query = MovieQuery {
        title: Some("A".into()),
        release_date: Some("2010-10-10".into()),
        ..MovieQuery::default()
    };
    let found = find::<Movie>(&store, &query).await?;
    assert_eq!(titles(&found), HashSet::from(["A", "B"]));

    // Empty strings are ignored.
    let query = MovieQuery { title: Some("".into()), ..MovieQuery::default() };
    assert_eq!(find::<Movie>(&store, &query).await?.len(), 3);

    // No match is not an error.
    let query = MovieQuery { title: Some("Z".into()), ..MovieQuery::default() };
    assert!(find::<Movie>(&store, &query).await?.is_empty());

    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn find_by_director_and_actor() -> Result<()> {
    let store = Store::in_memory();
    let (scott, weaver, hurt) = (ObjectId::new(), ObjectId::new(), ObjectId::new());
    insert::<Movie>(&store, &[
        NewMovie {
            director_id: Some(scott.into()),
            actor_ids: Some(vec![weaver.into(), hurt.into()]),
            ..new_movie("Alien", "1979-05-25")
        },
        NewMovie {
            actor_ids: Some(vec![weaver.into()]),
            ..new_movie("Aliens", "1986-07-18")
        },
        new_movie("Heat", "1995-12-15"),
    ]).await?;

    let query = MovieQuery { director_id: Some(scott.into()), ..MovieQuery::default() };
    assert_eq!(titles(&find::<Movie>(&store, &query).await?), HashSet::from(["Alien"]));

    let query = MovieQuery { actor_id: Some(weaver.into()), ..MovieQuery::default() };
    assert_eq!(titles(&find::<Movie>(&store, &query).await?), HashSet::from(["Alien", "Aliens"]));

    let query = MovieQuery { actor_id: Some(hurt.into()), ..MovieQuery::default() };
    assert_eq!(titles(&find::<Movie>(&store, &query).await?), HashSet::from(["Alien"]));

    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn find_with_malformed_arguments_fails() -> Result<()> {
    let store = Store::in_memory();
    insert::<Movie>(&store, &[new_movie("A", "2000-01-01")]).await?;

    let query = MovieQuery {
        id: Some(Id::from("abc")),
        release_date: Some("01.01.2000".into()),
        ..MovieQuery::default()
    };
    let err = find::<Movie>(&store, &query).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidInput);
    assert!(err.msg.contains("`id` 'abc'"), "{}", err.msg);
    assert!(err.msg.contains("`release_date` '01.01.2000'"), "{}", err.msg);

    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn invalid_batch_inserts_nothing() -> Result<()> {
    let store = Store::in_memory();
    let err = insert::<Movie>(&store, &[
        new_movie("Fine", "2000-01-01"),
        NewMovie { release_date: Some("2023-01-01".into()), ..NewMovie::default() },
        NewMovie {
            director_id: Some(Id::from("nope")),
            ..new_movie("Bad date", "2023-13-01")
        },
    ]).await.unwrap_err();

    assert_eq!(err.kind, ErrorKind::InvalidInput);
    assert_eq!(err.msg, format!(
        "Added 0 movies due to one or more errors: {}, {}, {}",
        "Movie missing required field `title`: `{\"release_date\":\"2023-01-01\"}`",
        "Movie has invalid field `release_date` (not a valid ISO 8601 date string \
            (expected 'YYYY-MM-DD')): `{\"title\":\"Bad date\",\"release_date\":\"2023-13-01\",\
            \"director_id\":\"nope\"}`",
        "Movie has invalid field `director_id` (not a valid ID, expected 24 hexadecimal \
            characters): `{\"title\":\"Bad date\",\"release_date\":\"2023-13-01\",\
            \"director_id\":\"nope\"}`",
    ));
    assert!(all_movies(&store).await?.is_empty());

    let err = insert::<Person>(&store, &[new_person("", "Nobody")]).await.unwrap_err();
    assert_eq!(
        err.msg,
        "Added 0 people due to one or more errors: Person missing required field \
            `first_name`: `{\"first_name\":\"\",\"last_name\":\"Nobody\"}`",
    );

    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn empty_batch_is_rejected() -> Result<()> {
    let store = Store::in_memory();

    let err = insert::<Movie>(&store, &[]).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidInput);
    assert_eq!(err.msg, "No movies provided");

    let err = insert::<Person>(&store, &[]).await.unwrap_err();
    assert_eq!(err.msg, "No people provided");

    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn duplicate_id_within_batch_inserts_nothing() -> Result<()> {
    let store = Store::in_memory();
    let id = ObjectId::new();
    let a = NewPerson { id: Some(id.into()), ..new_person("A", "B") };
    let b = NewPerson { id: Some(id.into()), ..new_person("C", "D") };

    let err = insert::<Person>(&store, &[new_person("E", "F"), a, b]).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidInput);
    assert!(err.msg.starts_with("Added 0 people due to one or more errors: "), "{}", err.msg);
    assert!(err.msg.contains("`id` (used by another record in this batch)"), "{}", err.msg);
    assert!(find::<Person>(&store, &PersonQuery::default()).await?.is_empty());

    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn existing_id_inserts_nothing() -> Result<()> {
    let store = Store::in_memory();
    let id = ObjectId::new();
    let existing = NewMovie { id: Some(id.into()), ..new_movie("Alien", "1979-05-25") };
    insert::<Movie>(&store, &[existing.clone()]).await?;

    let err = insert::<Movie>(&store, &[new_movie("Heat", "1995-12-15"), existing])
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidInput);
    assert_eq!(
        err.msg,
        format!("Added 0 movies due to one or more errors: Movie with ID '{id}' already exists"),
    );
    assert_eq!(titles(&all_movies(&store).await?), HashSet::from(["Alien"]));

    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn remove_without_ids_removes_everything() -> Result<()> {
    let store = Store::in_memory();
    insert::<Movie>(&store, &[
        new_movie("A", "2000-01-01"),
        new_movie("B", "2000-01-01"),
        new_movie("C", "2000-01-01"),
    ]).await?;

    assert_eq!(remove::<Movie>(&store, Some(&[][..]), &remove_all()).await?, "Deleted 3 movies");
    assert!(all_movies(&store).await?.is_empty());
    assert_eq!(remove::<Movie>(&store, None, &remove_all()).await?, "Deleted 0 movies");

    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn remove_without_ids_can_be_disabled() -> Result<()> {
    let store = Store::in_memory();
    insert::<Movie>(&store, &[new_movie("A", "2000-01-01")]).await?;

    let config = CatalogConfig { remove_all_without_ids: false };
    assert_eq!(remove::<Movie>(&store, None, &config).await?, "Deleted 0 movies");
    assert_eq!(remove::<Movie>(&store, Some(&[][..]), &config).await?, "Deleted 0 movies");
    assert_eq!(all_movies(&store).await?.len(), 1);

    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn remove_counts_are_pluralized() -> Result<()> {
    let store = Store::in_memory();
    let ids = [ObjectId::new(), ObjectId::new(), ObjectId::new()];
    let drafts = ids.iter()
        .map(|&id| NewPerson { id: Some(id.into()), ..new_person("A", "B") })
        .collect::<Vec<_>>();
    insert::<Person>(&store, &drafts).await?;

    let one = [Id::from(ids[0])];
    assert_eq!(remove::<Person>(&store, Some(&one[..]), &remove_all()).await?, "Deleted 1 person");
    assert_eq!(remove::<Person>(&store, Some(&one[..]), &remove_all()).await?, "Deleted 0 people");

    let rest = [Id::from(ids[1]), Id::from(ids[2]), Id::from(ObjectId::new())];
    assert_eq!(remove::<Person>(&store, Some(&rest[..]), &remove_all()).await?, "Deleted 2 people");

    let id = ObjectId::new();
    insert::<Movie>(&store, &[
        NewMovie { id: Some(id.into()), ..new_movie("A", "2000-01-01") },
        new_movie("B", "2000-01-01"),
    ]).await?;
    let one = [Id::from(id)];
    assert_eq!(remove::<Movie>(&store, Some(&one[..]), &remove_all()).await?, "Deleted 1 movie");
    assert_eq!(remove::<Movie>(&store, None, &remove_all()).await?, "Deleted 1 movie");

    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn remove_with_malformed_ids_deletes_nothing() -> Result<()> {
    let store = Store::in_memory();
    let id = ObjectId::new();
    insert::<Movie>(&store, &[NewMovie { id: Some(id.into()), ..new_movie("A", "2000-01-01") }])
        .await?;

    let ids = [Id::from(id), Id::from("short"), Id::from("zzzzzzzzzzzzzzzzzzzzzzzz")];
    let err = remove::<Movie>(&store, Some(&ids[..]), &remove_all()).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidInput);
    assert!(err.msg.starts_with("Deleted 0 movies due to invalid IDs"), "{}", err.msg);
    assert!(err.msg.contains("'short'"), "{}", err.msg);
    assert!(err.msg.contains("'zzzzzzzzzzzzzzzzzzzzzzzz'"), "{}", err.msg);
    assert_eq!(all_movies(&store).await?.len(), 1);

    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn find_by_ids_keeps_order_and_skips_dangling() -> Result<()> {
    let store = Store::in_memory();
    let (a, b, dangling) = (ObjectId::new(), ObjectId::new(), ObjectId::new());
    insert::<Person>(&store, &[
        NewPerson { id: Some(a.into()), ..new_person("Anna", "A") },
        NewPerson { id: Some(b.into()), ..new_person("Bert", "B") },
    ]).await?;

    let found = find_by_ids::<Person>(&store, &[b, dangling, a]).await?;
    let names = found.iter().map(|p| p.first_name.as_str()).collect::<Vec<_>>();
    assert_eq!(names, ["Bert", "Anna"]);

    assert!(find_by_ids::<Person>(&store, &[]).await?.is_empty());
    assert!(find_by_ids::<Person>(&store, &[dangling]).await?.is_empty());

    Ok(())
}
