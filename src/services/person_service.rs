// src/services/person_service.rs

use std::collections::{BTreeMap, HashMap};

use chrono::Utc;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        kyc::{EntityType, PersonRole},
        person::{CategoryAttachments, FieldValues, PersonRecord, PersonView},
    },
};

/// Monta um registro em branco no formato do tipo de entidade e o coloca no
/// fim da coleção.
///
/// Sem papel ou sem tipo de entidade não faz nada (o "Adicionar" desabilitado
/// da tela) e devolve `None`.
pub fn create_person(
    persons: &mut Vec<PersonRecord>,
    role: Option<PersonRole>,
    entity_type: Option<EntityType>,
) -> Option<&PersonRecord> {
    let (role, entity_type) = (role?, entity_type?);

    let attachments = entity_type
        .document_categories()
        .iter()
        .map(|category| CategoryAttachments {
            category: category.name.to_string(),
            files: Vec::new(),
        })
        .collect();

    persons.push(PersonRecord {
        id: Uuid::new_v4(),
        role,
        entity_type,
        fields: FieldValues::blank(entity_type),
        attachments,
        created_at: Utc::now(),
    });

    persons.last()
}

/// Converte a seleção vinda da tela. Vazio = seleção incompleta; valor fora
/// do catálogo = erro de configuração.
pub fn parse_selection(role: &str, entity_type: &str) -> Result<(PersonRole, EntityType), AppError> {
    let (role, entity_type) = (role.trim(), entity_type.trim());
    if role.is_empty() || entity_type.is_empty() {
        return Err(AppError::IncompleteSelection);
    }

    let role = PersonRole::from_name(role).ok_or_else(|| AppError::UnknownRole(role.to_string()))?;
    let entity_type =
        EntityType::from_name(entity_type).ok_or_else(|| AppError::UnknownEntityType(entity_type.to_string()))?;

    Ok((role, entity_type))
}

pub fn find_person_mut(persons: &mut [PersonRecord], id: Uuid) -> Result<&mut PersonRecord, AppError> {
    persons.iter_mut().find(|p| p.id == id).ok_or(AppError::PersonNotFound)
}

/// Remove o cartão. Nada é apagado no backend antes da submissão final.
pub fn remove_person(persons: &mut Vec<PersonRecord>, id: Uuid) -> bool {
    let before = persons.len();
    persons.retain(|p| p.id != id);
    persons.len() != before
}

/// Edita campos de uma pessoa. Um campo fora do tipo de entidade rejeita a
/// edição inteira.
pub fn update_fields(person: &mut PersonRecord, values: BTreeMap<String, String>) -> Result<(), AppError> {
    if let Some(field) = values.keys().find(|field| !person.entity_type.has_field(field)) {
        return Err(AppError::FieldNotApplicable {
            field: field.clone(),
            entity_type: person.entity_type.as_str().to_string(),
        });
    }

    for (field, value) in values {
        person.fields.set(&field, value);
    }
    Ok(())
}

/// Posição (a partir de 1) entre as pessoas com o mesmo papel e tipo de entidade.
pub fn display_number(persons: &[PersonRecord], id: Uuid) -> Option<usize> {
    let person = persons.iter().find(|p| p.id == id)?;
    persons
        .iter()
        .filter(|p| p.role == person.role && p.entity_type == person.entity_type)
        .position(|p| p.id == id)
        .map(|index| index + 1)
}

// Numera todas as pessoas de uma vez (uma passada só)
pub fn numbered(persons: &[PersonRecord]) -> Vec<PersonView> {
    let mut counters: HashMap<(PersonRole, EntityType), usize> = HashMap::new();
    persons
        .iter()
        .map(|person| {
            let counter = counters.entry((person.role, person.entity_type)).or_insert(0);
            *counter += 1;
            PersonView {
                display_number: *counter,
                person: person.clone(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn add(persons: &mut Vec<PersonRecord>, role: PersonRole, entity: EntityType) -> Uuid {
        create_person(persons, Some(role), Some(entity)).unwrap().id
    }

    #[test]
    fn created_record_is_shaped_by_its_entity_type() {
        for role in PersonRole::ALL {
            for entity in EntityType::ALL {
                let mut persons = Vec::new();
                let person = create_person(&mut persons, Some(role), Some(entity)).unwrap();

                let keys: Vec<&str> = person.fields.names().collect();
                assert_eq!(keys, entity.fields());
                assert!(person.fields.values().all(str::is_empty));

                let categories: Vec<&str> = person.attachments.iter().map(|c| c.category.as_str()).collect();
                let expected: Vec<&str> = entity.document_categories().iter().map(|c| c.name).collect();
                assert_eq!(categories, expected);
                assert!(person.attachments.iter().all(|c| c.files.is_empty()));
            }
        }
    }

    #[test]
    fn missing_selection_is_a_no_op() {
        let mut persons = Vec::new();
        assert!(create_person(&mut persons, None, Some(EntityType::Trust)).is_none());
        assert!(create_person(&mut persons, Some(PersonRole::Director), None).is_none());
        assert!(persons.is_empty());
    }

    #[test]
    fn parse_selection_separates_incomplete_from_invalid() {
        assert!(matches!(parse_selection("", "Individual"), Err(AppError::IncompleteSelection)));
        assert!(matches!(parse_selection("Director", " "), Err(AppError::IncompleteSelection)));
        assert!(matches!(parse_selection("Director", "Foundation"), Err(AppError::UnknownEntityType(_))));
        assert!(matches!(parse_selection("Secretary", "Trust"), Err(AppError::UnknownRole(_))));
        assert_eq!(
            parse_selection("Shareholder", "Corporate").unwrap(),
            (PersonRole::Shareholder, EntityType::Corporate)
        );
    }

    #[test]
    fn ids_are_unique_and_insertion_order_is_kept() {
        let mut persons = Vec::new();
        let ids: Vec<Uuid> = (0..50)
            .map(|_| add(&mut persons, PersonRole::Shareholder, EntityType::Individual))
            .collect();
        let mut unique = ids.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), 50);
        assert_eq!(persons.iter().map(|p| p.id).collect::<Vec<_>>(), ids);
    }

    #[test]
    fn display_numbers_are_per_role_and_entity_type() {
        let mut persons = Vec::new();
        let first = add(&mut persons, PersonRole::Shareholder, EntityType::Individual);
        let second = add(&mut persons, PersonRole::Shareholder, EntityType::Individual);
        let director = add(&mut persons, PersonRole::Director, EntityType::Individual);

        assert_eq!(display_number(&persons, first), Some(1));
        assert_eq!(display_number(&persons, second), Some(2));
        assert_eq!(display_number(&persons, director), Some(1));

        let numbers: Vec<usize> = numbered(&persons).iter().map(|v| v.display_number).collect();
        assert_eq!(numbers, vec![1, 2, 1]);

        // Numeração é recalculada depois de uma remoção
        assert!(remove_person(&mut persons, first));
        assert_eq!(display_number(&persons, second), Some(1));
        assert_eq!(display_number(&persons, first), None);
    }

    #[test]
    fn removing_an_unknown_person_changes_nothing() {
        let mut persons = Vec::new();
        add(&mut persons, PersonRole::Director, EntityType::Corporate);
        assert!(!remove_person(&mut persons, Uuid::new_v4()));
        assert_eq!(persons.len(), 1);
    }

    #[test]
    fn field_updates_are_restricted_to_the_entity_fields() {
        let mut persons = Vec::new();
        let id = add(&mut persons, PersonRole::Director, EntityType::Individual);
        let person = find_person_mut(&mut persons, id).unwrap();

        let ok = BTreeMap::from([("firstName".to_string(), "Asha".to_string())]);
        update_fields(person, ok).unwrap();
        assert_eq!(person.fields.get("firstName"), Some("Asha"));

        let mixed = BTreeMap::from([
            ("lastName".to_string(), "Ramgoolam".to_string()),
            ("trustName".to_string(), "Family Trust".to_string()),
        ]);
        let err = update_fields(person, mixed).unwrap_err();
        assert!(matches!(err, AppError::FieldNotApplicable { ref field, .. } if field == "trustName"));
        // Nada da edição rejeitada foi aplicado
        assert_eq!(person.fields.get("lastName"), Some(""));
        assert!(!person.fields.contains("trustName"));
    }
}
