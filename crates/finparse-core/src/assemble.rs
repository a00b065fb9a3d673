use rust_decimal::Decimal;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Serialize, Serializer};

use crate::model::{Field, StatementFormat, TransactionRecord};
use crate::parsing::values::parse_money;

/// Which columns an assembled table exposes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnLayout {
    /// Every canonical field, whatever the format (inapplicable ones are null).
    #[default]
    Canonical,
    /// Only the fields the statement format produces.
    Native,
}

impl ColumnLayout {
    pub fn from_str_loose(s: &str) -> Option<ColumnLayout> {
        match s.trim().to_lowercase().as_str() {
            "canonical" | "full" | "superset" => Some(ColumnLayout::Canonical),
            "native" | "format" => Some(ColumnLayout::Native),
            _ => None,
        }
    }
}

/// Brings the records of any extractor into one table shape.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordAssembler {
    pub layout: ColumnLayout,
}

impl RecordAssembler {
    pub fn new(layout: ColumnLayout) -> Self {
        RecordAssembler { layout }
    }

    pub fn columns(&self, format: StatementFormat) -> Vec<Field> {
        match self.layout {
            ColumnLayout::Canonical => Field::CANONICAL.to_vec(),
            ColumnLayout::Native => format.native_columns().to_vec(),
        }
    }

    /// Build the table. Values of fields outside the layout are cleared so a
    /// record never carries data its table does not show.
    pub fn assemble(
        &self,
        format: StatementFormat,
        records: Vec<TransactionRecord>,
    ) -> StatementTable {
        let columns = self.columns(format);
        let records = records
            .into_iter()
            .map(|mut record| {
                for field in Field::CANONICAL {
                    if field != Field::TxnType && !columns.contains(&field) {
                        record.set(field, None);
                    }
                }
                record
            })
            .collect();

        StatementTable {
            format,
            columns,
            records,
        }
    }
}

/// Records of one statement sharing a single column set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementTable {
    pub format: StatementFormat,
    /// Keys every record exposes, in output order.
    pub columns: Vec<Field>,
    pub records: Vec<TransactionRecord>,
}

impl StatementTable {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn has_column(&self, field: Field) -> bool {
        self.columns.contains(&field)
    }

    /// Remove a column from the table and its value from every record.
    pub fn drop_column(&mut self, field: Field) {
        self.columns.retain(|f| *f != field);
        for record in &mut self.records {
            record.set(field, None);
        }
    }

    /// One record's values in column order.
    pub fn row<'a>(&'a self, record: &'a TransactionRecord) -> Vec<Option<&'a str>> {
        self.columns.iter().map(|f| record.get(*f)).collect()
    }

    /// Sum of every amount that parses as money. Unparseable or missing
    /// amounts count as zero.
    pub fn total_amount(&self) -> Decimal {
        self.records
            .iter()
            .filter_map(|r| r.amount.as_deref().and_then(parse_money))
            .sum()
    }

    pub fn views(&self) -> impl Iterator<Item = RecordView<'_>> {
        self.records.iter().map(|record| RecordView {
            columns: &self.columns,
            record,
        })
    }
}

/// A record seen through its table's columns. Serializes as a map whose keys
/// follow column order, with nulls kept.
#[derive(Debug, Clone, Copy)]
pub struct RecordView<'a> {
    columns: &'a [Field],
    record: &'a TransactionRecord,
}

impl Serialize for RecordView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for field in self.columns {
            map.serialize_entry(field.as_str(), &self.record.get(*field))?;
        }
        map.end()
    }
}

impl Serialize for StatementTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.records.len()))?;
        for view in self.views() {
            seq.serialize_element(&view)?;
        }
        seq.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TxnType;
    use rust_decimal_macros::dec;

    fn wallet_record() -> TransactionRecord {
        TransactionRecord {
            date: Some("02-02-2024".into()),
            txn_type: TxnType::UpiDr,
            transaction: Some("UPI".into()),
            direction: Some("DR".into()),
            party: Some("Jane Doe".into()),
            upi_id: Some("jane@okaxis".into()),
            amount: Some("250.00".into()),
            particulars: Some("stray".into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_canonical_layout_has_every_field() {
        let table =
            RecordAssembler::default().assemble(StatementFormat::Wallet, vec![wallet_record()]);
        assert_eq!(table.columns, Field::CANONICAL.to_vec());
        let json = serde_json::to_value(&table).unwrap();
        let obj = json[0].as_object().unwrap();
        assert_eq!(obj.len(), 14);
        assert!(obj["account"].is_null());
        assert_eq!(obj["txn_type"], "UPI/DR");
    }

    #[test]
    fn test_native_layout_clears_foreign_fields() {
        let table = RecordAssembler::new(ColumnLayout::Native)
            .assemble(StatementFormat::Wallet, vec![wallet_record()]);
        assert_eq!(table.columns, StatementFormat::Wallet.native_columns().to_vec());
        assert_eq!(table.records[0].particulars, None);
        assert_eq!(table.records[0].party.as_deref(), Some("Jane Doe"));
    }

    #[test]
    fn test_json_keys_follow_column_order() {
        let table = RecordAssembler::new(ColumnLayout::Native)
            .assemble(StatementFormat::Wallet, vec![wallet_record()]);
        let json = serde_json::to_string(&table).unwrap();
        let date = json.find("\"date\"").unwrap();
        let transaction = json.find("\"transaction\"").unwrap();
        let cheque = json.find("\"cheque_no\"").unwrap();
        assert!(date < transaction && transaction < cheque);
    }

    #[test]
    fn test_every_record_shares_the_key_set() {
        let sparse = TransactionRecord::default();
        let table = RecordAssembler::default()
            .assemble(StatementFormat::Ledger, vec![wallet_record(), sparse]);
        let json = serde_json::to_value(&table).unwrap();
        let keys = |i: usize| json[i].as_object().unwrap().keys().cloned().collect::<Vec<_>>();
        assert_eq!(keys(0), keys(1));
    }

    #[test]
    fn test_drop_column() {
        let mut table =
            RecordAssembler::default().assemble(StatementFormat::Wallet, vec![wallet_record()]);
        table.drop_column(Field::UpiId);
        assert!(!table.has_column(Field::UpiId));
        assert_eq!(table.records[0].upi_id, None);
        assert_eq!(table.row(&table.records[0]).len(), 13);
    }

    #[test]
    fn test_total_amount_skips_unparseable() {
        let amounts = [Some("1,200.50"), Some("250"), None, Some("n/a")];
        let records = amounts
            .iter()
            .map(|a| TransactionRecord {
                amount: a.map(String::from),
                ..Default::default()
            })
            .collect();
        let table = RecordAssembler::default().assemble(StatementFormat::Table, records);
        assert_eq!(table.total_amount(), dec!(1450.50));
    }

    #[test]
    fn test_layout_from_str_loose() {
        assert_eq!(ColumnLayout::from_str_loose("Native"), Some(ColumnLayout::Native));
        assert_eq!(ColumnLayout::from_str_loose("wide"), None);
    }
}
