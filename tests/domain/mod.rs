mod language_test;
mod storage_path_test;
