use super::*;

fn unit(name: &str) -> UnitParam {
    UnitParam {
        name: name.to_string(),
        description: None,
    }
}

/// Tests building the school and faculty hierarchy.
///
/// Expected: Ok with the faculty inheriting the school's organization
#[tokio::test]
async fn creates_school_and_faculty() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_organization_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let (_, org) = factory::helpers::create_organization_with_owner(db).await?;

    let schools = SchoolRepository::new(db);
    let school = schools.create(org.id, unit("Engineering")).await?;
    assert_eq!(schools.list(org.id).await?.len(), 1);

    let faculties = FacultyRepository::new(db);
    let faculty = faculties.create(&school, unit("Computer Science")).await?;

    assert_eq!(faculty.organization_id, org.id);
    assert_eq!(faculties.list_for_school(school.id).await?.len(), 1);

    Ok(())
}

/// Tests faculty member management.
///
/// Expected: Ok with the member listed after adding and gone after removal
#[tokio::test]
async fn manages_faculty_members() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_organization_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let (_, org) = factory::helpers::create_organization_with_owner(db).await?;
    let school = factory::organization::create_school(db, org.id).await?;
    let faculty = factory::organization::create_faculty(db, org.id, school.id).await?;
    let professor = factory::helpers::create_user_with_role(db, org.id, "instructor").await?;

    let repo = FacultyRepository::new(db);
    repo.add_member(faculty.id, professor.id, Some("Professor".to_string()))
        .await?;

    assert!(repo.is_member(faculty.id, professor.id).await?);
    let members = repo.members(faculty.id).await?;
    assert_eq!(members.len(), 1);
    assert_eq!(members[0].title.as_deref(), Some("Professor"));

    assert!(repo.remove_member(faculty.id, professor.id).await?);
    assert!(repo.members(faculty.id).await?.is_empty());

    Ok(())
}
