mod load_test;
mod mysql_destination_test;
mod pipeline_test;
mod sources_test;
