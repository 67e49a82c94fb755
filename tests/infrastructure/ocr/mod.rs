mod tesseract_engine_test;
