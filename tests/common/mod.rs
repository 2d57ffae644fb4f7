//! Shared fixture entities

#![allow(dead_code)]

use graphql_orm::{
    EntityDef, EntityRef, FieldDef, FieldKind, GraphqlEntity, OrmError, OrmResult, Value,
};

#[derive(Debug, Default)]
pub struct Task {
    pub id: i64,
    pub title: Option<String>,
    pub user: Option<EntityRef<User>>,
}

impl GraphqlEntity for Task {
    fn definition() -> EntityDef {
        EntityDef::new("tasks")
            .repository("TaskRepository")
            .field(FieldDef::scalar("id", FieldKind::Int).identifier())
            .field(FieldDef::scalar("title", FieldKind::String))
            .field(FieldDef::relation::<User>("user"))
    }

    fn apply_field(&mut self, field: &str, value: Value) -> OrmResult<()> {
        match field {
            "id" => self.id = value.into_i64().unwrap_or_default(),
            "title" => self.title = value.into_string(),
            "user" => self.user = value.into_entity::<User>(),
            other => return Err(OrmError::unknown_field("Task", other)),
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct User {
    pub id: i64,
    pub name: Option<String>,
}

impl GraphqlEntity for User {
    fn definition() -> EntityDef {
        EntityDef::new("users")
            .field(FieldDef::scalar("id", FieldKind::Int).identifier())
            .field(FieldDef::scalar("name", FieldKind::String))
    }

    fn apply_field(&mut self, field: &str, value: Value) -> OrmResult<()> {
        match field {
            "id" => self.id = value.into_i64().unwrap_or_default(),
            "name" => self.name = value.into_string(),
            other => return Err(OrmError::unknown_field("User", other)),
        }
        Ok(())
    }
}

/// Self-referential entity for cycle handling.
#[derive(Debug, Default)]
pub struct Employee {
    pub id: i64,
    pub manager: Option<EntityRef<Employee>>,
}

impl GraphqlEntity for Employee {
    fn definition() -> EntityDef {
        EntityDef::new("employees")
            .field(FieldDef::scalar("id", FieldKind::Int).identifier())
            .field(FieldDef::relation::<Employee>("manager"))
    }

    fn apply_field(&mut self, field: &str, value: Value) -> OrmResult<()> {
        match field {
            "id" => self.id = value.into_i64().unwrap_or_default(),
            "manager" => self.manager = value.into_entity::<Employee>(),
            other => return Err(OrmError::unknown_field("Employee", other)),
        }
        Ok(())
    }
}
