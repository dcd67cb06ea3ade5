mod reconciliation_test;
mod records_test;
