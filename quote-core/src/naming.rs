use chrono::{Local, NaiveDate};

use crate::models::GeneralInfo;

/// Suggests a file stem (no extension) for saving a quote, dated today when
/// the quote has no date.
pub fn suggest_file_stem(general: &GeneralInfo) -> String {
    suggest_file_stem_on(general, Local::now().date_naive())
}

/// Suggests a file stem from the quote's details, first match wins:
///
/// 1. `{plate}_{model}_{date}`
/// 2. `{client}_{model}_{date}`
/// 3. `{plate}_{client}_{date}`
/// 4. `{client}_no-model_{date}`
/// 5. `no-info_{date}`
///
/// `date` is the quote date with `/` replaced by `-`, or `today` as
/// `DD-MM-YYYY` when the quote date is blank.
pub fn suggest_file_stem_on(
    general: &GeneralInfo,
    today: NaiveDate,
) -> String {
    let plate = general.license_plate.trim();
    let model = general.model.trim();
    let client = general.client.trim();
    let date = file_date(&general.quote_date, today);

    match (plate.is_empty(), model.is_empty(), client.is_empty()) {
        (false, false, _) => format!("{plate}_{model}_{date}"),
        (_, false, false) => format!("{client}_{model}_{date}"),
        (false, _, false) => format!("{plate}_{client}_{date}"),
        (_, _, false) => format!("{client}_no-model_{date}"),
        _ => format!("no-info_{date}"),
    }
}

fn file_date(
    quote_date: &str,
    today: NaiveDate,
) -> String {
    let quote_date = quote_date.trim();
    if quote_date.is_empty() {
        today.format("%d-%m-%Y").to_string()
    } else {
        quote_date.replace('/', "-")
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 7).unwrap()
    }

    fn general(
        client: &str,
        plate: &str,
        model: &str,
        date: &str,
    ) -> GeneralInfo {
        GeneralInfo {
            client: client.to_string(),
            license_plate: plate.to_string(),
            model: model.to_string(),
            quote_date: date.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn plate_and_model_win() {
        let result = suggest_file_stem_on(&general("Rossi", "AB123CD", "Panda", "2024-03-01"), today());

        assert_eq!(result, "AB123CD_Panda_2024-03-01");
    }

    #[test]
    fn client_and_model_without_plate() {
        let result = suggest_file_stem_on(&general("Rossi", "", "Panda", "2024-03-01"), today());

        assert_eq!(result, "Rossi_Panda_2024-03-01");
    }

    #[test]
    fn plate_and_client_without_model() {
        let result = suggest_file_stem_on(&general("Rossi", "AB123CD", " ", "2024-03-01"), today());

        assert_eq!(result, "AB123CD_Rossi_2024-03-01");
    }

    #[test]
    fn client_only() {
        let result = suggest_file_stem_on(&general(" Rossi ", "", "", "2024-03-01"), today());

        assert_eq!(result, "Rossi_no-model_2024-03-01");
    }

    #[test]
    fn plate_only_has_no_info() {
        let result = suggest_file_stem_on(&general("", "AB123CD", "", "2024-03-01"), today());

        assert_eq!(result, "no-info_2024-03-01");
    }

    #[test]
    fn slashes_in_date_become_dashes() {
        let result = suggest_file_stem_on(&general("", "", "", "07/03/2024"), today());

        assert_eq!(result, "no-info_07-03-2024");
    }

    #[test]
    fn blank_date_uses_today() {
        let result = suggest_file_stem_on(&general("Rossi", "", "", ""), today());

        assert_eq!(result, "Rossi_no-model_07-03-2024");
    }
}
